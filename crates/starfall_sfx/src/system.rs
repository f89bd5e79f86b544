//! # Effect System
//!
//! Spawns effects into a body's frame and drives every pool in a frame tree.
//!
//! ## Per-tick contract
//!
//! 1. `spawn` any number of times (gameplay events)
//! 2. `time_step_all` once, from the root frame
//! 3. `render_all` once per drawn frame, from the root frame
//!
//! Traversals are depth-first, parent before children, children in the
//! order the tree reports them. Every frame is visited exactly once, whether
//! or not its pool was ever used.
//!
//! ## Save/load
//!
//! `serialize` writes only live effects, ascending by slot. `deserialize`
//! packs them into slots `0..n` of a fresh pool: the set of effects survives
//! a save/load cycle, their slot indices do not.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use starfall_shared::Vec3d;
use tracing::{trace, warn};

use crate::body::Body;
use crate::codec::{SaveReader, SaveWriter, COUNT_SIZE, RECORD_SIZE};
use crate::config::SfxConfig;
use crate::error::{SfxError, SfxResult};
use crate::frame::FrameTree;
use crate::pool::{EffectPool, POOL_CAPACITY};
use crate::render::{EffectRenderer, EffectStyle};
use crate::slot::{EffectKind, EffectSlot};

/// Running totals, cleared by [`EffectSystem::reset_stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SfxStats {
    /// Effects written into a slot.
    pub spawned: u64,
    /// Spawns dropped because the frame's pool was full.
    pub dropped: u64,
    /// Effects that outlived their lifespan.
    pub retired: u64,
}

/// Effect orchestrator.
///
/// Generic over the random source used for spark impulses; the default is a
/// ChaCha8 stream seeded from [`SfxConfig::rng_seed`], so a replay with the
/// same seed spawns identical sparks.
pub struct EffectSystem<R = ChaCha8Rng> {
    config: SfxConfig,
    style: EffectStyle,
    rng: R,
    stats: SfxStats,
}

impl EffectSystem<ChaCha8Rng> {
    /// Creates a system seeded from `config`.
    #[must_use]
    pub fn new(config: SfxConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        Self::with_rng(config, rng)
    }
}

impl Default for EffectSystem<ChaCha8Rng> {
    fn default() -> Self {
        Self::new(SfxConfig::default())
    }
}

impl<R: Rng> EffectSystem<R> {
    /// Creates a system drawing impulses from `rng`.
    #[must_use]
    pub fn with_rng(config: SfxConfig, rng: R) -> Self {
        Self {
            style: config.style(),
            config,
            rng,
            stats: SfxStats::default(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SfxConfig {
        &self.config
    }

    /// Totals since creation or the last reset.
    #[must_use]
    pub const fn stats(&self) -> SfxStats {
        self.stats
    }

    /// Zeroes the totals.
    pub fn reset_stats(&mut self) {
        self.stats = SfxStats::default();
    }

    /// Spawns an effect of `kind` on `body`, in the body's frame.
    ///
    /// - Damage: inherits the body's velocity plus a random impulse of up to
    ///   `damage_impulse / 2` per axis
    /// - Explosion: radius is half the body's bounding radius
    ///
    /// Returns `false` if the frame's pool is full (the effect is dropped)
    /// or `kind` is [`EffectKind::None`].
    pub fn spawn<T, B>(&mut self, tree: &mut T, body: &B, kind: EffectKind) -> bool
    where
        T: FrameTree,
        B: Body<Frame = T::Frame>,
    {
        if kind == EffectKind::None {
            return false;
        }

        let Some(slot) = tree.effects_mut(body.frame()).allocate() else {
            self.stats.dropped += 1;
            trace!("Effect pool full, dropping {:?}", kind);
            return false;
        };

        let position = body.position();
        let mut velocity = body.velocity();
        *slot = match kind {
            EffectKind::Damage => {
                velocity += self.unit_cube_offset() * self.config.damage_impulse;
                EffectSlot::damage(position, velocity)
            }
            EffectKind::Explosion => {
                EffectSlot::explosion(position, velocity, body.bounding_radius() / 2.0)
            }
            EffectKind::None => EffectSlot::Empty,
        };

        self.stats.spawned += 1;
        true
    }

    /// Uniform point in `[-0.5, 0.5)³`.
    fn unit_cube_offset(&mut self) -> Vec3d {
        let x = self.rng.gen::<f64>() - 0.5;
        let y = self.rng.gen::<f64>() - 0.5;
        let z = self.rng.gen::<f64>() - 0.5;
        Vec3d::new(x, y, z)
    }

    /// Advances every pool under `root` (inclusive) by `dt` seconds.
    ///
    /// Returns the number of frames visited.
    pub fn time_step_all<T: FrameTree>(&mut self, tree: &mut T, dt: f32, root: T::Frame) -> usize {
        let retired = tree.effects_mut(root).time_step(dt);
        self.stats.retired += retired as u64;

        let mut visited = 1;
        let child_count = tree.children(root).len();
        for i in 0..child_count {
            let child = tree.children(root)[i];
            visited += self.time_step_all(tree, dt, child);
        }
        visited
    }

    /// Renders every pool under `root` (inclusive) as seen from `camera`.
    ///
    /// The frame-to-camera transform is computed once per visited frame.
    /// Returns the number of frames visited.
    pub fn render_all<T, Out>(
        &self,
        tree: &T,
        root: T::Frame,
        camera: T::Frame,
        renderer: &mut Out,
    ) -> usize
    where
        T: FrameTree,
        Out: EffectRenderer + ?Sized,
    {
        let transform = tree.transform_between(root, camera);
        tree.effects(root).render(&transform, &self.style, &mut *renderer);

        let mut visited = 1;
        for &child in tree.children(root) {
            visited += self.render_all(tree, child, camera, &mut *renderer);
        }
        visited
    }

    /// Writes `frame`'s live effects to `writer`.
    ///
    /// Returns the number of effects written.
    pub fn serialize<T: FrameTree>(&self, tree: &T, frame: T::Frame, writer: &mut SaveWriter) -> usize {
        let pool = tree.effects(frame);
        let live = pool.live_count();
        // At most POOL_CAPACITY, always fits.
        writer.write_i32(i32::try_from(live).unwrap_or(i32::MAX));
        for (_, slot) in pool.iter_live() {
            writer.write_effect(slot);
        }
        live
    }

    /// Reads one frame block from `reader` into `frame`.
    ///
    /// A non-zero count replaces the frame's pool with the saved effects. A
    /// count of zero leaves the frame's pool as it is. On error the frame is
    /// untouched.
    ///
    /// Returns the number of effects restored.
    ///
    /// # Errors
    ///
    /// [`SfxError::CorruptState`] if the count is negative or above
    /// [`POOL_CAPACITY`], the stream ends before the declared records, or a
    /// record is invalid.
    pub fn deserialize<T: FrameTree>(
        &self,
        reader: &mut SaveReader<'_>,
        tree: &mut T,
        frame: T::Frame,
    ) -> SfxResult<usize> {
        let pool = self.read_pool(reader).map_err(|err| {
            warn!("Rejecting effect save block: {}", err);
            err
        })?;
        let Some(pool) = pool else {
            return Ok(0);
        };
        let restored = pool.live_count();
        *tree.effects_mut(frame) = pool;
        Ok(restored)
    }

    /// `None` for an empty block.
    fn read_pool(&self, reader: &mut SaveReader<'_>) -> SfxResult<Option<EffectPool>> {
        reader.ensure(COUNT_SIZE, "effect count")?;
        let count_offset = reader.position();
        let raw_count = reader.read_i32()?;

        let count = usize::try_from(raw_count)
            .ok()
            .filter(|&count| count <= POOL_CAPACITY)
            .ok_or_else(|| {
                SfxError::corrupt(
                    count_offset,
                    format!("effect count {raw_count} outside 0..={POOL_CAPACITY}"),
                )
            })?;
        if count == 0 {
            return Ok(None);
        }
        reader.ensure(count * RECORD_SIZE, "effect records")?;

        let mut pool = EffectPool::new();
        for _ in 0..count {
            let offset = reader.position();
            let effect = reader.read_effect(self.config.restored_explosion_radius)?;
            let slot = pool
                .allocate()
                .ok_or_else(|| SfxError::corrupt(offset, "more effects than pool slots"))?;
            *slot = effect;
        }
        Ok(Some(pool))
    }
}
