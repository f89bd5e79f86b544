//! # Galaxy Map
//!
//! Maps a sector coordinate onto the density bitmap:
//!
//! ```text
//! ox = ( sx * sector_size + sol_offset.x) / radius     -1..1 inside the galaxy
//! oy = (-sy * sector_size + sol_offset.y) / radius
//! u, v = clamp((o + 1) / 2, 0, 1)
//! density = pixel(floor(u * (w - 1)), floor(v * (h - 1)))
//! ```
//!
//! Sector `y` grows "up" while image rows grow down, hence the sign flip.
//! Anything past the rim reads the edge pixel.

use tracing::info;

use crate::bitmap::DensityBitmap;
use crate::config::GalaxyConfig;
use crate::error::{GalaxyError, GalaxyResult};

/// The loaded density map. Construct once at startup and pass by reference.
#[derive(Clone, Debug)]
pub struct GalaxyMap {
    config: GalaxyConfig,
    bitmap: DensityBitmap,
}

impl GalaxyMap {
    /// Loads and decodes `config.bitmap_path` as 8-bit greyscale.
    ///
    /// # Errors
    ///
    /// - [`GalaxyError::InvalidConfig`] if `config` fails validation
    /// - [`GalaxyError::MissingBitmap`] if the file is missing or undecodable
    pub fn open(config: &GalaxyConfig) -> GalaxyResult<Self> {
        config.validate()?;
        let path = &config.bitmap_path;
        let image = image::open(path)
            .map_err(|e| GalaxyError::MissingBitmap {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
            .into_luma8();

        let width = image.width() as usize;
        let height = image.height() as usize;
        let bitmap = DensityBitmap::from_raw(width, height, width, image.into_raw())?;
        info!("Galaxy map loaded: {} ({}x{})", path.display(), width, height);
        Self::from_bitmap(config.clone(), bitmap)
    }

    /// Builds a map from pixels already in memory.
    ///
    /// # Errors
    ///
    /// [`GalaxyError::InvalidConfig`] if `config` fails validation.
    pub fn from_bitmap(config: GalaxyConfig, bitmap: DensityBitmap) -> GalaxyResult<Self> {
        config.validate()?;
        Ok(Self { config, bitmap })
    }

    /// Star density of sector (`sx`, `sy`), 0 (empty) to 255 (core).
    #[must_use]
    pub fn density(&self, sx: i32, sy: i32) -> u8 {
        let GalaxyConfig {
            radius,
            sol_offset,
            sector_size,
            ..
        } = &self.config;
        let ox = (f64::from(sx) * sector_size + sol_offset[0]) / radius;
        let oy = (-f64::from(sy) * sector_size + sol_offset[1]) / radius;
        self.bitmap.sample((ox + 1.0) * 0.5, (oy + 1.0) * 0.5)
    }

    /// The decoded bitmap.
    #[must_use]
    pub const fn bitmap(&self) -> &DensityBitmap {
        &self.bitmap
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GalaxyConfig {
        &self.config
    }

    /// Releases the bitmap.
    pub fn shutdown(self) {
        info!(
            "Galaxy map released ({}x{})",
            self.bitmap.width(),
            self.bitmap.height()
        );
    }
}
