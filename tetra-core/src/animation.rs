/// Frame-driven rotation and injectable frame sources
use std::f64::consts::TAU;

use crate::config::AnimationConfig;
use crate::transform::RotationState;

/// One display frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Zero-based frame number since the source started
    pub index: u64,
}

/// Anything that can hand out display frames.
///
/// Returning `None` ends the loop. The browser has no implementation: its
/// frames come from `requestAnimationFrame` callbacks instead.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<FrameTick>;
}

/// Yields a fixed number of frames immediately, for deterministic runs
#[derive(Debug, Clone)]
pub struct FixedFrames {
    next: u64,
    count: u64,
}

impl FixedFrames {
    pub fn new(count: u64) -> Self {
        Self { next: 0, count }
    }
}

impl FrameSource for FixedFrames {
    fn next_frame(&mut self) -> Option<FrameTick> {
        if self.next >= self.count {
            return None;
        }
        let tick = FrameTick { index: self.next };
        self.next += 1;
        Some(tick)
    }
}

/// Advances the tetrahedron orientation by a fixed step per frame.
///
/// The spin (`y`) completes a full turn every `spin_period_secs` at
/// `reference_fps`; the tilt (`x`) turns at half that rate. Speed is tied to
/// the frame count, not wall-clock time.
///
/// Angles are derived from the frame counter in `f64` rather than summed in
/// `f32`, so the step stays exact however long the loop runs. The applied
/// orientation is reduced to `[0, 2π)`.
#[derive(Debug, Clone)]
pub struct Animator {
    rotation: RotationState,
    delta_x: f64,
    delta_y: f64,
    frames: u64,
}

impl Animator {
    pub fn new(config: &AnimationConfig) -> Self {
        let delta_y = TAU / (config.spin_period_secs as f64 * config.reference_fps as f64);
        Self {
            rotation: RotationState::zero(),
            delta_x: delta_y / 2.0,
            delta_y,
            frames: 0,
        }
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    /// Advance one frame and return the new orientation
    pub fn tick(&mut self) -> RotationState {
        self.frames += 1;
        let (x, y) = self.angles();
        self.rotation = RotationState::new((x % TAU) as f32, (y % TAU) as f32);
        self.rotation
    }

    /// Total accumulated `(x, y)` angles, never wrapped
    fn angles(&self) -> (f64, f64) {
        let frames = self.frames as f64;
        (frames * self.delta_x, frames * self.delta_y)
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(&AnimationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    /// Distance between two angles on the circle
    fn angle_gap(a: f64, b: f64) -> f64 {
        let gap = (a - b).rem_euclid(TAU);
        gap.min(TAU - gap)
    }

    #[test]
    fn test_default_step() {
        let animator = Animator::default();
        assert!((animator.delta_y - TAU / 1800.0).abs() < 1e-12);
        assert!((animator.delta_x - animator.delta_y / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_spin_after_1800_frames() {
        let mut animator = Animator::default();
        let mut frames = FixedFrames::new(1800);
        while frames.next_frame().is_some() {
            animator.tick();
        }
        assert_eq!(animator.frames, 1800);

        let (x, y) = animator.angles();
        assert!((y - TAU).abs() < 1e-9);
        assert!((x - PI).abs() < 1e-9);

        let rotation = animator.rotation();
        assert!(angle_gap(rotation.y as f64, 0.0) < 1e-3);
        assert!(angle_gap(rotation.x as f64, PI) < 1e-3);
    }

    #[test]
    fn test_angles_increase_monotonically() {
        let mut animator = Animator::default();
        let mut previous = animator.angles();
        for _ in 0..100 {
            animator.tick();
            let current = animator.angles();
            assert!(current.0 > previous.0);
            assert!(current.1 > previous.1);
            previous = current;
        }
    }

    #[test]
    fn test_step_stays_exact_on_long_runs() {
        let mut animator = Animator::default();
        for _ in 0..20_000_000u64 {
            animator.tick();
        }
        let (x, y) = animator.angles();
        animator.tick();
        let (next_x, next_y) = animator.angles();

        let step_x = next_x - x;
        let step_y = next_y - y;
        assert!((step_y - animator.delta_y).abs() / animator.delta_y < 1e-6);
        assert!((step_x - animator.delta_x).abs() / animator.delta_x < 1e-6);

        let rotation = animator.rotation();
        assert!(rotation.y >= 0.0);
        let expected_y = (20_000_001.0 * animator.delta_y).rem_euclid(TAU);
        assert!(angle_gap(rotation.y as f64, expected_y) < 1e-4);
    }

    #[test]
    fn test_fixed_frames_count() {
        let mut frames = FixedFrames::new(3);
        let indices: Vec<u64> = std::iter::from_fn(|| frames.next_frame())
            .map(|tick| tick.index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
