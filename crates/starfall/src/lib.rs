//! # Starfall
//!
//! Integration crate: galaxy density drives how busy a region is, the
//! effect system turns that activity into explosions and sparks attached to
//! reference frames.
//!
//! ```text
//!   GalaxyMap::density(sector) ──► spawn count
//!                                      │
//!   FrameGraph ◄── EffectSystem::spawn ┘
//!       │
//!       ├── time_step_all ──► retire expired effects
//!       ├── render_all ─────► DrawList
//!       └── serialize / deserialize ──► save stream
//! ```
//!
//! ## Modules
//!
//! - `soak`: headless run exercising the whole path, used by the
//!   `starfall_soak` binary and the integration tests

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod soak;

pub use starfall_galaxy as galaxy;
pub use starfall_sfx as sfx;
pub use starfall_shared as shared;

pub use soak::{run_soak, scaled_spawns, SoakConfig, SoakError, SoakReport, SoakResult};
