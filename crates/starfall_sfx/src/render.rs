//! # Effect Draw Commands
//!
//! Effects never touch the graphics API. Rendering a pool emits
//! [`DrawCommand`]s into an [`EffectRenderer`]; the renderer owns texture
//! binding, blend state and batching.
//!
//! All commands are additive-blended and depth-write disabled.

use starfall_shared::Vec3d;

/// Texture a draw command samples from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectTexture {
    /// Soft glow billboard behind an explosion.
    Halo,
    /// Fireball wrapped around the explosion sphere.
    Explosion,
    /// Puff used for damage sparks.
    Smoke,
}

impl EffectTexture {
    /// Asset path relative to the data directory.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Halo => "textures/halo.png",
            Self::Explosion => "textures/explosion.png",
            Self::Smoke => "textures/smoke.png",
        }
    }
}

/// One draw, already placed in camera space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    /// Camera-facing unit quad scaled by `scale`.
    Billboard {
        /// Quad centre in camera space.
        center: Vec3d,
        /// Uniform scale.
        scale: f64,
        /// RGBA tint.
        color: [f32; 4],
        /// Texture to sample.
        texture: EffectTexture,
    },
    /// Textured unit sphere scaled by `scale`.
    Sphere {
        /// Sphere centre in camera space.
        center: Vec3d,
        /// Uniform scale.
        scale: f64,
        /// Slices and stacks.
        segments: u32,
        /// RGBA tint.
        color: [f32; 4],
        /// Texture to sample.
        texture: EffectTexture,
    },
    /// Single point sprite.
    PointSprite {
        /// Sprite position in camera space.
        position: Vec3d,
        /// Sprite size.
        size: f32,
        /// RGBA tint.
        color: [f32; 4],
        /// Texture to sample.
        texture: EffectTexture,
    },
}

impl DrawCommand {
    /// Texture this command samples.
    #[must_use]
    pub const fn texture(&self) -> EffectTexture {
        match self {
            Self::Billboard { texture, .. }
            | Self::Sphere { texture, .. }
            | Self::PointSprite { texture, .. } => *texture,
        }
    }

    /// Tint colour.
    #[must_use]
    pub const fn color(&self) -> [f32; 4] {
        match self {
            Self::Billboard { color, .. }
            | Self::Sphere { color, .. }
            | Self::PointSprite { color, .. } => *color,
        }
    }

    /// Camera-space position.
    #[must_use]
    pub const fn position(&self) -> Vec3d {
        match self {
            Self::Billboard { center, .. } | Self::Sphere { center, .. } => *center,
            Self::PointSprite { position, .. } => *position,
        }
    }
}

/// Sizes that are not derived from effect state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectStyle {
    /// Point sprite size for damage sparks.
    pub damage_sprite_size: f32,
    /// Slices and stacks of the explosion sphere.
    pub sphere_segments: u32,
}

impl Default for EffectStyle {
    fn default() -> Self {
        Self {
            damage_sprite_size: 20.0,
            sphere_segments: 20,
        }
    }
}

/// Sink for draw commands.
pub trait EffectRenderer {
    /// Queues one draw.
    fn draw(&mut self, command: DrawCommand);
}

/// Renderer that just records commands, in submission order.
///
/// Reuse one list across frames with [`DrawList::clear`] to keep its buffer.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Creates an empty list with room for `capacity` commands.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Drops recorded commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Recorded commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl EffectRenderer for DrawList {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
