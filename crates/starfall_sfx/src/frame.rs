//! # Reference Frames
//!
//! Effects live in the local space of a reference frame. The effect system
//! only needs four things from the frame hierarchy, captured by
//! [`FrameTree`]: ordered children, the transform between two frames, and
//! shared/exclusive access to a frame's [`EffectPool`].
//!
//! [`FrameGraph`] is a small arena-backed hierarchy implementing it, used by
//! tools and tests.

use starfall_shared::Matrix4x4d;

use crate::pool::EffectPool;

/// What the effect system needs from a frame hierarchy.
///
/// Implementations must return the same children, in the same order, for the
/// duration of a traversal.
pub trait FrameTree {
    /// Frame handle.
    type Frame: Copy;

    /// Children of `frame`, in traversal order.
    fn children(&self, frame: Self::Frame) -> &[Self::Frame];

    /// Transform mapping points in `from`'s local space into `to`'s space.
    fn transform_between(&self, from: Self::Frame, to: Self::Frame) -> Matrix4x4d;

    /// Effect pool owned by `frame`.
    fn effects(&self, frame: Self::Frame) -> &EffectPool;

    /// Mutable effect pool owned by `frame`.
    fn effects_mut(&mut self, frame: Self::Frame) -> &mut EffectPool;
}

/// Handle to a frame in a [`FrameGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(usize);

impl FrameId {
    /// Arena index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
struct FrameNode {
    name: String,
    parent: Option<FrameId>,
    children: Vec<FrameId>,
    /// Maps this frame's space into the parent's.
    local: Matrix4x4d,
    effects: EffectPool,
}

/// Arena-backed frame hierarchy with a single root.
///
/// Frames are never removed, so a [`FrameId`] stays valid for the life of
/// the graph. Passing an id from another graph panics.
#[derive(Clone, Debug)]
pub struct FrameGraph {
    nodes: Vec<FrameNode>,
}

impl FrameGraph {
    /// The root frame of every graph.
    pub const ROOT: FrameId = FrameId(0);

    /// Creates a graph holding only a root frame.
    #[must_use]
    pub fn new(root_name: &str) -> Self {
        Self {
            nodes: vec![FrameNode {
                name: root_name.to_owned(),
                parent: None,
                children: Vec::new(),
                local: Matrix4x4d::IDENTITY,
                effects: EffectPool::new(),
            }],
        }
    }

    /// Root frame.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> FrameId {
        Self::ROOT
    }

    /// Adds a frame under `parent`. `local` maps the new frame's space into
    /// the parent's and must be rigid (rotation + translation).
    pub fn add_child(&mut self, parent: FrameId, name: &str, local: Matrix4x4d) -> FrameId {
        let id = FrameId(self.nodes.len());
        self.nodes.push(FrameNode {
            name: name.to_owned(),
            parent: Some(parent),
            children: Vec::new(),
            local,
            effects: EffectPool::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Number of frames, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a graph has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All frame ids in creation order.
    pub fn frames(&self) -> impl Iterator<Item = FrameId> {
        (0..self.nodes.len()).map(FrameId)
    }

    /// Frame name.
    #[must_use]
    pub fn name(&self, frame: FrameId) -> &str {
        &self.nodes[frame.0].name
    }

    /// Parent frame, `None` for the root.
    #[must_use]
    pub fn parent(&self, frame: FrameId) -> Option<FrameId> {
        self.nodes[frame.0].parent
    }

    /// Transform from `frame` into its parent.
    #[must_use]
    pub fn local_transform(&self, frame: FrameId) -> Matrix4x4d {
        self.nodes[frame.0].local
    }

    /// Moves `frame` relative to its parent.
    pub fn set_local_transform(&mut self, frame: FrameId, local: Matrix4x4d) {
        self.nodes[frame.0].local = local;
    }

    /// Transform from `frame` into root space.
    #[must_use]
    pub fn to_root(&self, frame: FrameId) -> Matrix4x4d {
        let mut node = &self.nodes[frame.0];
        let mut transform = node.local;
        while let Some(parent) = node.parent {
            node = &self.nodes[parent.0];
            transform = node.local * transform;
        }
        transform
    }
}

impl FrameTree for FrameGraph {
    type Frame = FrameId;

    fn children(&self, frame: FrameId) -> &[FrameId] {
        &self.nodes[frame.0].children
    }

    fn transform_between(&self, from: FrameId, to: FrameId) -> Matrix4x4d {
        if from == to {
            return Matrix4x4d::IDENTITY;
        }
        self.to_root(to).inverse_rigid() * self.to_root(from)
    }

    fn effects(&self, frame: FrameId) -> &EffectPool {
        &self.nodes[frame.0].effects
    }

    fn effects_mut(&mut self, frame: FrameId) -> &mut EffectPool {
        &mut self.nodes[frame.0].effects
    }
}
