/// Wall-clock frame pacing for the terminal loop
use std::time::{Duration, Instant};
use tetra_core::{FrameSource, FrameTick};

/// Hands out frames no faster than the target rate, sleeping in between
pub struct PacedFrames {
    frame_time: Duration,
    last_frame: Option<Instant>,
    index: u64,
}

impl PacedFrames {
    pub fn new(fps: u32) -> Self {
        Self {
            frame_time: Duration::from_nanos(1_000_000_000 / fps.max(1) as u64),
            last_frame: None,
            index: 0,
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }
}

impl FrameSource for PacedFrames {
    fn next_frame(&mut self) -> Option<FrameTick> {
        if let Some(last) = self.last_frame {
            let elapsed = last.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());

        let tick = FrameTick { index: self.index };
        self.index += 1;
        Some(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_time() {
        assert_eq!(PacedFrames::new(50).frame_time(), Duration::from_millis(20));
        // Zero is treated as one frame per second
        assert_eq!(PacedFrames::new(0).frame_time(), Duration::from_secs(1));
    }

    #[test]
    fn test_paces_frames() {
        let mut frames = PacedFrames::new(100);
        let start = Instant::now();
        for expected in 0..3 {
            assert_eq!(frames.next_frame(), Some(FrameTick { index: expected }));
        }
        // The first frame is immediate, the next two wait 10ms each
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
