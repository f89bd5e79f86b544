//! # Effect Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file (or no file) gives the stock look.
//!
//! ```toml
//! rng_seed = 42
//! damage_impulse = 200.0
//! damage_sprite_size = 20.0
//! sphere_segments = 20
//! restored_explosion_radius = 1.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SfxError, SfxResult};
use crate::render::EffectStyle;

/// Default seed for the spark impulse generator.
pub const DEFAULT_RNG_SEED: u64 = 0x5354_4152_4641_4C4C;

/// Tunables for the effect system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SfxConfig {
    /// Seed for the random impulse given to damage sparks.
    pub rng_seed: u64,
    /// Scale of the random impulse added to a damage spark's velocity.
    /// Each axis gets `damage_impulse * [-0.5, 0.5)`.
    pub damage_impulse: f64,
    /// Point sprite size for damage sparks.
    pub damage_sprite_size: f32,
    /// Slices and stacks of the explosion sphere.
    pub sphere_segments: u32,
    /// Radius given to explosions read back from a save.
    /// The save layout does not carry the radius.
    pub restored_explosion_radius: f64,
}

impl Default for SfxConfig {
    fn default() -> Self {
        Self {
            rng_seed: DEFAULT_RNG_SEED,
            damage_impulse: 200.0,
            damage_sprite_size: 20.0,
            sphere_segments: 20,
            restored_explosion_radius: 1.0,
        }
    }
}

impl SfxConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`SfxError::InvalidConfig`] on a parse error or an out-of-range value.
    pub fn from_toml_str(text: &str) -> SfxResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| SfxError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SfxError::InvalidConfig`] if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> SfxResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SfxError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SfxError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> SfxResult<()> {
        if !self.damage_impulse.is_finite() || self.damage_impulse < 0.0 {
            return Err(SfxError::InvalidConfig(format!(
                "damage_impulse must be finite and >= 0, got {}",
                self.damage_impulse
            )));
        }
        if !self.damage_sprite_size.is_finite() || self.damage_sprite_size <= 0.0 {
            return Err(SfxError::InvalidConfig(format!(
                "damage_sprite_size must be > 0, got {}",
                self.damage_sprite_size
            )));
        }
        if self.sphere_segments < 3 {
            return Err(SfxError::InvalidConfig(format!(
                "sphere_segments must be >= 3, got {}",
                self.sphere_segments
            )));
        }
        if !self.restored_explosion_radius.is_finite() || self.restored_explosion_radius < 0.0 {
            return Err(SfxError::InvalidConfig(format!(
                "restored_explosion_radius must be finite and >= 0, got {}",
                self.restored_explosion_radius
            )));
        }
        Ok(())
    }

    /// Render style derived from this config.
    #[must_use]
    pub const fn style(&self) -> EffectStyle {
        EffectStyle {
            damage_sprite_size: self.damage_sprite_size,
            sphere_segments: self.sphere_segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = SfxConfig::from_toml_str("").unwrap();
        assert_eq!(config, SfxConfig::default());
        assert_eq!(config.damage_impulse, 200.0);
    }

    #[test]
    fn test_partial_document_overrides() {
        let config = SfxConfig::from_toml_str("rng_seed = 7\nsphere_segments = 32\n").unwrap();
        assert_eq!(config.rng_seed, 7);
        assert_eq!(config.sphere_segments, 32);
        assert_eq!(config.damage_sprite_size, 20.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SfxConfig::from_toml_str("damage_impulse = -1.0"),
            Err(SfxError::InvalidConfig(_))
        ));
        assert!(matches!(
            SfxConfig::from_toml_str("sphere_segments = 2"),
            Err(SfxError::InvalidConfig(_))
        ));
        assert!(matches!(
            SfxConfig::from_toml_str("no_such_field = 1"),
            Err(SfxError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SfxConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, SfxError::InvalidConfig(_)));
    }
}
