//! Depth-first traversal of frame trees by the effect system.

use std::cell::Cell;

use starfall::sfx::{
    BodySnapshot, DrawCommand, DrawList, EffectKind, EffectPool, EffectRenderer, EffectSystem,
    FrameGraph, FrameId, FrameTree,
};
use starfall::shared::{Matrix4x4d, Vec3d};

/// Balanced tree: every frame down to `depth` has `fanout` children.
fn balanced_graph(depth: usize, fanout: usize) -> FrameGraph {
    let mut graph = FrameGraph::new("root");
    let mut level = vec![FrameGraph::ROOT];
    for _ in 0..depth {
        let mut next = Vec::new();
        for &parent in &level {
            for i in 0..fanout {
                next.push(graph.add_child(parent, &format!("f{i}"), Matrix4x4d::IDENTITY));
            }
        }
        level = next;
    }
    graph
}

#[test]
fn test_every_frame_visited_once() {
    let mut system = EffectSystem::default();
    for (depth, fanout, expected) in [(0, 3, 1), (1, 5, 6), (3, 2, 15), (2, 4, 21)] {
        let mut graph = balanced_graph(depth, fanout);
        assert_eq!(graph.len(), expected);
        assert_eq!(system.time_step_all(&mut graph, 0.1, FrameGraph::ROOT), expected);

        let mut list = DrawList::new();
        assert_eq!(
            system.render_all(&graph, FrameGraph::ROOT, FrameGraph::ROOT, &mut list),
            expected
        );
        // Untouched pools stay unmaterialized through both passes.
        assert!(graph.frames().all(|f| !graph.effects(f).is_allocated()));
    }
}

#[test]
fn test_subtree_traversal_only_reaches_descendants() {
    let mut system = EffectSystem::default();
    let mut graph = FrameGraph::new("root");
    let left = graph.add_child(FrameGraph::ROOT, "left", Matrix4x4d::IDENTITY);
    let right = graph.add_child(FrameGraph::ROOT, "right", Matrix4x4d::IDENTITY);
    graph.add_child(left, "left-child", Matrix4x4d::IDENTITY);

    for frame in [left, right] {
        let ship = BodySnapshot {
            frame,
            position: Vec3d::ZERO,
            velocity: Vec3d::ZERO,
            bounding_radius: 2.0,
        };
        system.spawn(&mut graph, &ship, EffectKind::Damage);
    }

    // Stepping only the left subtree past the lifespan retires only its spark.
    assert_eq!(system.time_step_all(&mut graph, 3.0, left), 2);
    assert_eq!(graph.effects(left).live_count(), 0);
    assert_eq!(graph.effects(right).live_count(), 1);
}

/// Records the order frames' effects are drawn in, via the x coordinate.
#[derive(Default)]
struct OrderRecorder {
    xs: Vec<f64>,
}

impl EffectRenderer for OrderRecorder {
    fn draw(&mut self, command: DrawCommand) {
        self.xs.push(command.position().x);
    }
}

#[test]
fn test_render_order_is_parent_then_children_in_order() {
    let mut system = EffectSystem::default();
    let mut graph = FrameGraph::new("root");
    let a = graph.add_child(FrameGraph::ROOT, "a", Matrix4x4d::IDENTITY);
    let a1 = graph.add_child(a, "a1", Matrix4x4d::IDENTITY);
    let b = graph.add_child(FrameGraph::ROOT, "b", Matrix4x4d::IDENTITY);

    let spark_at = |frame: FrameId, x: f64| BodySnapshot {
        frame,
        position: Vec3d::new(x, 0.0, 0.0),
        velocity: Vec3d::ZERO,
        bounding_radius: 1.0,
    };
    for (frame, x) in [(b, 3.0), (a1, 2.0), (FrameGraph::ROOT, 0.0), (a, 1.0)] {
        system.spawn(&mut graph, &spark_at(frame, x), EffectKind::Damage);
    }

    let mut recorder = OrderRecorder::default();
    assert_eq!(system.render_all(&graph, FrameGraph::ROOT, FrameGraph::ROOT, &mut recorder), 4);
    // Damage impulses move nothing at render time; positions are as spawned.
    assert_eq!(recorder.xs, vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_nested_frames_render_in_camera_space() {
    let mut system = EffectSystem::default();
    let mut graph = FrameGraph::new("root");
    let planet = graph.add_child(
        FrameGraph::ROOT,
        "planet",
        Matrix4x4d::translation(Vec3d::new(0.0, 0.0, 1_000.0)),
    );
    let station = graph.add_child(
        planet,
        "station",
        Matrix4x4d::translation(Vec3d::new(10.0, 0.0, 0.0)),
    );
    let camera = graph.add_child(
        planet,
        "camera",
        Matrix4x4d::translation(Vec3d::new(0.0, 0.0, -5.0)),
    );

    let ship = BodySnapshot {
        frame: station,
        position: Vec3d::new(1.0, 1.0, 1.0),
        velocity: Vec3d::ZERO,
        bounding_radius: 6.0,
    };
    system.spawn(&mut graph, &ship, EffectKind::Explosion);

    let mut list = DrawList::new();
    system.render_all(&graph, FrameGraph::ROOT, camera, &mut list);
    assert_eq!(list.len(), 2);
    for command in list.commands() {
        assert!(command.position().distance(Vec3d::new(11.0, 1.0, 6.0)) < 1e-9);
    }
}

/// Minimal frame tree over a flat list: frame 0 is the root, all others
/// are its children and share the root's space. Counts transform requests.
struct FlatTree {
    children: Vec<usize>,
    pools: Vec<EffectPool>,
    transforms: Cell<usize>,
}

impl FrameTree for FlatTree {
    type Frame = usize;

    fn children(&self, frame: usize) -> &[usize] {
        if frame == 0 {
            &self.children
        } else {
            &[]
        }
    }

    fn transform_between(&self, _from: usize, _to: usize) -> Matrix4x4d {
        self.transforms.set(self.transforms.get() + 1);
        Matrix4x4d::IDENTITY
    }

    fn effects(&self, frame: usize) -> &EffectPool {
        &self.pools[frame]
    }

    fn effects_mut(&mut self, frame: usize) -> &mut EffectPool {
        &mut self.pools[frame]
    }
}

#[test]
fn test_custom_frame_tree() {
    let mut tree = FlatTree {
        children: vec![1, 2, 3],
        pools: vec![EffectPool::new(); 4],
        transforms: Cell::new(0),
    };
    let mut system = EffectSystem::default();
    let ship = BodySnapshot {
        frame: 2usize,
        position: Vec3d::X,
        velocity: Vec3d::ZERO,
        bounding_radius: 2.0,
    };
    assert!(system.spawn(&mut tree, &ship, EffectKind::Explosion));
    assert_eq!(system.time_step_all(&mut tree, 0.5, 0), 4);

    let mut list = DrawList::new();
    assert_eq!(system.render_all(&tree, 0, 0, &mut list), 4);
    assert_eq!(list.len(), 2);
    assert_eq!(tree.pools[2].live_count(), 1);
    // One transform per frame, not per effect, and none during time steps.
    assert_eq!(tree.transforms.get(), 4);
}

#[test]
fn test_one_transform_per_frame() {
    let mut system = EffectSystem::default();
    for frames in [1usize, 2, 9, 64] {
        let mut tree = FlatTree {
            children: (1..frames).collect(),
            pools: vec![EffectPool::new(); frames],
            transforms: Cell::new(0),
        };
        // Several effects in one frame still cost a single transform.
        let ship = BodySnapshot {
            frame: frames - 1,
            position: Vec3d::Y,
            velocity: Vec3d::ZERO,
            bounding_radius: 2.0,
        };
        for _ in 0..5 {
            system.spawn(&mut tree, &ship, EffectKind::Damage);
        }

        let mut list = DrawList::new();
        assert_eq!(system.render_all(&tree, 0, 0, &mut list), frames);
        assert_eq!(list.len(), 5);
        assert_eq!(tree.transforms.get(), frames);

        tree.transforms.set(0);
        system.render_all(&tree, 0, 0, &mut list);
        assert_eq!(tree.transforms.get(), frames);
    }
}
