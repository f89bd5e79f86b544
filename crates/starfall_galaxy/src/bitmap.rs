//! 8-bit greyscale density image.

use crate::error::{GalaxyError, GalaxyResult};

/// Row-major single-channel pixels. Row `y` starts at `y * pitch`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DensityBitmap {
    width: usize,
    height: usize,
    pitch: usize,
    pixels: Vec<u8>,
}

impl DensityBitmap {
    /// Wraps raw pixels.
    ///
    /// # Errors
    ///
    /// [`GalaxyError::InvalidBitmap`] if either dimension is zero, `pitch` is
    /// narrower than a row, or `pixels` is too short for the last row.
    pub fn from_raw(width: usize, height: usize, pitch: usize, pixels: Vec<u8>) -> GalaxyResult<Self> {
        if width == 0 || height == 0 {
            return Err(GalaxyError::InvalidBitmap(format!(
                "empty bitmap {width}x{height}"
            )));
        }
        if pitch < width {
            return Err(GalaxyError::InvalidBitmap(format!(
                "pitch {pitch} narrower than width {width}"
            )));
        }
        let needed = pitch * (height - 1) + width;
        if pixels.len() < needed {
            return Err(GalaxyError::InvalidBitmap(format!(
                "{} bytes for {width}x{height} (pitch {pitch}), need {needed}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pitch,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row.
    #[must_use]
    pub const fn pitch(&self) -> usize {
        self.pitch
    }

    /// Raw pixel bytes. The last row may stop at `width`.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at (`x`, `y`), `None` outside the image.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(x + y * self.pitch).copied()
    }

    /// Nearest pixel below normalized (`u`, `v`), both clamped to `[0, 1]`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn sample(&self, u: f64, v: f64) -> u8 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        // In [0, width - 1] after clamping, so the casts are exact.
        let x = (u * (self.width - 1) as f64).floor() as usize;
        let y = (v * (self.height - 1) as f64).floor() as usize;
        self.pixels[x + y * self.pitch]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_validates() {
        assert!(DensityBitmap::from_raw(0, 4, 4, vec![]).is_err());
        assert!(DensityBitmap::from_raw(4, 4, 3, vec![0; 16]).is_err());
        assert!(DensityBitmap::from_raw(4, 4, 4, vec![0; 15]).is_err());
        // Short last row is fine.
        assert!(DensityBitmap::from_raw(4, 2, 8, vec![0; 12]).is_ok());
    }

    #[test]
    fn test_sample_uses_pitch() {
        // 2x2 image padded to 4 bytes per row.
        let bitmap = DensityBitmap::from_raw(2, 2, 4, vec![10, 20, 0, 0, 30, 40, 0, 0]).unwrap();
        assert_eq!(bitmap.sample(0.0, 0.0), 10);
        assert_eq!(bitmap.sample(1.0, 0.0), 20);
        assert_eq!(bitmap.sample(0.0, 1.0), 30);
        assert_eq!(bitmap.sample(1.0, 1.0), 40);
        // Floors, and clamps out-of-range coordinates.
        assert_eq!(bitmap.sample(0.99, 0.99), 10);
        assert_eq!(bitmap.sample(-5.0, 7.0), 30);
        assert_eq!(bitmap.get(1, 1), Some(40));
        assert_eq!(bitmap.get(2, 0), None);
    }
}
