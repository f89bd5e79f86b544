//! # Galaxy Configuration
//!
//! ```toml
//! bitmap_path = "data/galaxy.png"
//! radius = 50000.0          # light years, centre to rim
//! sol_offset = [25000.0, 0.0]
//! sector_size = 8.0         # light years per sector
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GalaxyError, GalaxyResult};

/// Where the bitmap lives and how sector coordinates map onto it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalaxyConfig {
    /// Greyscale density image.
    pub bitmap_path: PathBuf,
    /// Galaxy radius; the bitmap spans `[-radius, radius]` on both axes.
    pub radius: f64,
    /// Position of sector (0, 0) relative to the galactic centre.
    pub sol_offset: [f64; 2],
    /// Edge length of one sector.
    pub sector_size: f64,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            bitmap_path: PathBuf::from("data/galaxy.png"),
            radius: 50_000.0,
            sol_offset: [25_000.0, 0.0],
            sector_size: 8.0,
        }
    }
}

impl GalaxyConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError::InvalidConfig`] on a parse error or an out-of-range value.
    pub fn from_toml_str(text: &str) -> GalaxyResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| GalaxyError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError::InvalidConfig`] if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> GalaxyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GalaxyError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> GalaxyResult<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GalaxyError::InvalidConfig(format!(
                "radius must be finite and > 0, got {}",
                self.radius
            )));
        }
        if !self.sector_size.is_finite() || self.sector_size <= 0.0 {
            return Err(GalaxyError::InvalidConfig(format!(
                "sector_size must be finite and > 0, got {}",
                self.sector_size
            )));
        }
        if !self.sol_offset.iter().all(|v| v.is_finite()) {
            return Err(GalaxyError::InvalidConfig(format!(
                "sol_offset must be finite, got {:?}",
                self.sol_offset
            )));
        }
        if self.bitmap_path.as_os_str().is_empty() {
            return Err(GalaxyError::InvalidConfig("bitmap_path is empty".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GalaxyConfig::from_toml_str("").unwrap();
        assert_eq!(config.bitmap_path, PathBuf::from("data/galaxy.png"));
        assert_eq!(config.radius, 50_000.0);
        assert_eq!(config.sol_offset, [25_000.0, 0.0]);
        assert_eq!(config.sector_size, 8.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        for text in ["radius = 0.0", "sector_size = -8.0", "bitmap_path = \"\"", "typo = 1"] {
            assert!(
                matches!(GalaxyConfig::from_toml_str(text), Err(GalaxyError::InvalidConfig(_))),
                "{text} accepted"
            );
        }
    }
}
