//! What a body must expose to spawn an effect.

use starfall_shared::Vec3d;

/// Read-only view of a body at spawn time.
///
/// Position and velocity are in the local space of [`Body::frame`].
pub trait Body {
    /// Frame handle, matching the frame tree the effect is spawned into.
    type Frame: Copy;

    /// Frame the body is currently in.
    fn frame(&self) -> Self::Frame;

    /// Position in frame space.
    fn position(&self) -> Vec3d;

    /// Velocity in frame space.
    fn velocity(&self) -> Vec3d;

    /// Radius of the bounding sphere.
    fn bounding_radius(&self) -> f64;
}

/// Plain-data body, for callers without a body model of their own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySnapshot<F> {
    /// Frame the body is in.
    pub frame: F,
    /// Position in frame space.
    pub position: Vec3d,
    /// Velocity in frame space.
    pub velocity: Vec3d,
    /// Bounding sphere radius.
    pub bounding_radius: f64,
}

impl<F: Copy> Body for BodySnapshot<F> {
    type Frame = F;

    fn frame(&self) -> F {
        self.frame
    }

    fn position(&self) -> Vec3d {
        self.position
    }

    fn velocity(&self) -> Vec3d {
        self.velocity
    }

    fn bounding_radius(&self) -> f64 {
        self.bounding_radius
    }
}
