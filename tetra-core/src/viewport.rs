/// Output surface dimensions
use crate::error::{Result, TetraError};

/// Logical viewport size plus the device pixel ratio of the backing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_pixel_ratio(width, height, 1.0)
    }

    pub fn with_pixel_ratio(width: u32, height: u32, pixel_ratio: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TetraError::EmptyViewport { width, height });
        }
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Ok(Self {
            width,
            height,
            pixel_ratio,
        })
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Logical size as floats, as line materials expect it
    pub fn resolution(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    /// Size of the backing surface in physical pixels
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width as f32 * self.pixel_ratio).round() as u32,
            (self.height as f32 * self.pixel_ratio).round() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            Viewport::new(0, 600),
            Err(TetraError::EmptyViewport { width: 0, height: 600 })
        ));
        assert!(Viewport::new(800, 0).is_err());
    }

    #[test]
    fn test_physical_size() {
        let viewport = Viewport::with_pixel_ratio(800, 600, 2.0).unwrap();
        assert_eq!(viewport.physical_size(), (1600, 1200));
        assert_eq!(viewport.resolution(), (800.0, 600.0));
    }

    #[test]
    fn test_bad_pixel_ratio_falls_back() {
        let viewport = Viewport::with_pixel_ratio(10, 10, f32::NAN).unwrap();
        assert_eq!(viewport.pixel_ratio, 1.0);
    }
}
