//! # Starfall SFX
//!
//! Short-lived visual effects (explosions, damage sparks) attached to the
//! reference frame of the body that produced them.
//!
//! - Each frame owns one fixed-capacity [`EffectPool`] (1024 slots, created
//!   on first use)
//! - [`EffectSystem`] spawns effects and drives every pool in a
//!   [`FrameTree`] depth-first
//! - Rendering emits [`DrawCommand`]s into an [`EffectRenderer`]; no graphics
//!   API is touched here
//! - Live effects can be saved per frame and restored ([`SaveWriter`],
//!   [`SaveReader`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use starfall_sfx::{BodySnapshot, DrawList, EffectKind, EffectSystem, FrameGraph};
//!
//! let mut frames = FrameGraph::new("system");
//! let mut sfx = EffectSystem::default();
//! sfx.spawn(&mut frames, &ship, EffectKind::Explosion);
//! sfx.time_step_all(&mut frames, dt, FrameGraph::ROOT);
//! sfx.render_all(&frames, FrameGraph::ROOT, camera, &mut draw_list);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod body;
pub mod codec;
pub mod config;
pub mod error;
pub mod frame;
pub mod pool;
pub mod render;
pub mod slot;
pub mod system;

pub use body::{Body, BodySnapshot};
pub use codec::{SaveReader, SaveWriter, COUNT_SIZE, RECORD_SIZE};
pub use config::{SfxConfig, DEFAULT_RNG_SEED};
pub use error::{SfxError, SfxResult};
pub use frame::{FrameGraph, FrameId, FrameTree};
pub use pool::{EffectPool, POOL_CAPACITY};
pub use render::{DrawCommand, DrawList, EffectRenderer, EffectStyle, EffectTexture};
pub use slot::{
    EffectKind, EffectSlot, EffectState, DAMAGE_LIFESPAN, EXPLOSION_GROWTH, EXPLOSION_LIFESPAN,
};
pub use system::{EffectSystem, SfxStats};
