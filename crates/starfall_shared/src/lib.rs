//! # Starfall Shared
//!
//! Common math used by every Starfall crate.
//!
//! Positions in space are stored in double precision: a star system is far
//! too large for `f32` to place a ship to the metre.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;

pub use math::{Matrix4x4d, Vec3d};
