//! # Starfall Galaxy
//!
//! Star density across the galaxy, sampled from a pre-rendered greyscale
//! bitmap. Sector generation asks [`GalaxyMap::density`] how crowded a
//! sector is and scales its star count accordingly.
//!
//! ## Lifecycle
//!
//! ```rust,ignore
//! let map = GalaxyMap::open(&GalaxyConfig::default())?; // startup
//! let crowding = map.density(sx, sy);                    // any time
//! map.shutdown();                                        // teardown
//! ```
//!
//! A missing bitmap is unrecoverable for the game; [`GalaxyMap::open`]
//! reports it as [`GalaxyError::MissingBitmap`] and the caller decides how
//! to exit.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod bitmap;
pub mod config;
pub mod error;
pub mod map;

pub use bitmap::DensityBitmap;
pub use config::GalaxyConfig;
pub use error::{GalaxyError, GalaxyResult};
pub use map::GalaxyMap;
