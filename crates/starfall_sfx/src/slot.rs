//! # Effect Slots
//!
//! One slot holds at most one effect. The variant *is* the liveness flag:
//! an [`EffectSlot::Empty`] slot carries no position, velocity or age, so
//! nothing can read stale state out of a retired effect.
//!
//! ## Lifecycle
//!
//! ```text
//!   Empty ──spawn──► Explosion ──age > 2s──► Empty
//!   Empty ──spawn──► Damage    ──age > 2s──► Empty
//! ```
//!
//! A slot never changes kind without passing through `Empty`.

use starfall_shared::{Matrix4x4d, Vec3d};

use crate::render::{DrawCommand, EffectRenderer, EffectStyle, EffectTexture};

/// Seconds an explosion lives.
pub const EXPLOSION_LIFESPAN: f32 = 2.0;

/// Seconds a damage spark lives.
pub const DAMAGE_LIFESPAN: f32 = 2.0;

/// How many radii an explosion grows by over its life.
pub const EXPLOSION_GROWTH: f64 = 29.0;

/// Effect kind, as written in saves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum EffectKind {
    /// Free slot.
    None = 0,
    /// Expanding fireball left by a destroyed body.
    Explosion = 1,
    /// Spark thrown off a body taking damage.
    Damage = 2,
}

impl EffectKind {
    /// Converts from the save representation.
    #[inline]
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Explosion),
            2 => Some(Self::Damage),
            _ => None,
        }
    }

    /// Save representation.
    #[inline]
    #[must_use]
    pub const fn to_i32(self) -> i32 {
        self as i32
    }

    /// Seconds before an effect of this kind retires. `None` for free slots.
    #[inline]
    #[must_use]
    pub const fn lifespan(self) -> Option<f32> {
        match self {
            Self::None => None,
            Self::Explosion => Some(EXPLOSION_LIFESPAN),
            Self::Damage => Some(DAMAGE_LIFESPAN),
        }
    }
}

/// Kinematic state shared by every live effect.
///
/// Position and velocity are in the owning frame's local space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectState {
    /// Position in frame space.
    pub position: Vec3d,
    /// Velocity in frame space, units per second.
    pub velocity: Vec3d,
    /// Seconds since spawn.
    pub age: f32,
}

impl EffectState {
    /// Fresh state at age zero.
    #[inline]
    #[must_use]
    pub const fn spawned(position: Vec3d, velocity: Vec3d) -> Self {
        Self {
            position,
            velocity,
            age: 0.0,
        }
    }

    #[inline]
    fn advance(&mut self, dt: f32) {
        self.age += dt;
        self.position += self.velocity * f64::from(dt);
    }
}

/// A pool slot: empty, or one live effect.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EffectSlot {
    /// Free.
    #[default]
    Empty,
    /// Live explosion.
    Explosion {
        /// Kinematics.
        state: EffectState,
        /// Starting radius; the fireball grows from here.
        radius: f64,
    },
    /// Live damage spark.
    Damage {
        /// Kinematics.
        state: EffectState,
    },
}

impl EffectSlot {
    /// New explosion at age zero.
    #[must_use]
    pub const fn explosion(position: Vec3d, velocity: Vec3d, radius: f64) -> Self {
        Self::Explosion {
            state: EffectState::spawned(position, velocity),
            radius,
        }
    }

    /// New damage spark at age zero.
    #[must_use]
    pub const fn damage(position: Vec3d, velocity: Vec3d) -> Self {
        Self::Damage {
            state: EffectState::spawned(position, velocity),
        }
    }

    /// Builds a slot from its parts. `radius` is ignored for sparks.
    /// Returns `None` for [`EffectKind::None`].
    #[must_use]
    pub const fn from_parts(kind: EffectKind, state: EffectState, radius: f64) -> Option<Self> {
        match kind {
            EffectKind::None => None,
            EffectKind::Explosion => Some(Self::Explosion { state, radius }),
            EffectKind::Damage => Some(Self::Damage { state }),
        }
    }

    /// Kind tag.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EffectKind {
        match self {
            Self::Empty => EffectKind::None,
            Self::Explosion { .. } => EffectKind::Explosion,
            Self::Damage { .. } => EffectKind::Damage,
        }
    }

    /// True if the slot holds an effect.
    #[inline]
    #[must_use]
    pub const fn is_live(&self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// Kinematic state of a live effect.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> Option<&EffectState> {
        match self {
            Self::Empty => None,
            Self::Explosion { state, .. } | Self::Damage { state } => Some(state),
        }
    }

    /// Explosion radius, if this is an explosion.
    #[inline]
    #[must_use]
    pub const fn radius(&self) -> Option<f64> {
        match self {
            Self::Explosion { radius, .. } => Some(*radius),
            _ => None,
        }
    }

    /// Advances the effect by `dt` seconds, then retires it if it outlived
    /// its kind's lifespan. Empty slots are left alone.
    ///
    /// Returns `true` if this step retired the effect.
    pub fn time_step(&mut self, dt: f32) -> bool {
        let expired = match self {
            Self::Empty => return false,
            Self::Explosion { state, .. } => {
                state.advance(dt);
                state.age > EXPLOSION_LIFESPAN
            }
            Self::Damage { state } => {
                state.advance(dt);
                state.age > DAMAGE_LIFESPAN
            }
        };
        if expired {
            *self = Self::Empty;
        }
        expired
    }

    /// Emits this effect's draw commands. `transform` maps the owning frame
    /// into camera space. Reads state only.
    ///
    /// Returns the number of commands emitted.
    pub fn render<R: EffectRenderer + ?Sized>(
        &self,
        transform: &Matrix4x4d,
        style: &EffectStyle,
        renderer: &mut R,
    ) -> usize {
        match self {
            Self::Empty => 0,
            Self::Explosion { state, radius } => {
                let radius = *radius;
                let center = transform.transform_point(state.position);
                let growth = (state.age / EXPLOSION_LIFESPAN).sqrt();
                let scale = radius + radius * EXPLOSION_GROWTH * f64::from(growth);
                let fade = 1.0 - growth;

                renderer.draw(DrawCommand::Billboard {
                    center,
                    scale,
                    color: [1.0, 1.0, 0.75, fade],
                    texture: EffectTexture::Halo,
                });
                renderer.draw(DrawCommand::Sphere {
                    center,
                    scale,
                    segments: style.sphere_segments,
                    color: [1.0, 0.2, 0.1, fade],
                    texture: EffectTexture::Explosion,
                });
                2
            }
            Self::Damage { state } => {
                renderer.draw(DrawCommand::PointSprite {
                    position: transform.transform_point(state.position),
                    size: style.damage_sprite_size,
                    color: [1.0, 1.0, 0.0, 1.0 - state.age / DAMAGE_LIFESPAN],
                    texture: EffectTexture::Smoke,
                });
                1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawList;

    #[test]
    fn test_kind_roundtrip_and_rejects_unknown() {
        for kind in [EffectKind::None, EffectKind::Explosion, EffectKind::Damage] {
            assert_eq!(EffectKind::from_i32(kind.to_i32()), Some(kind));
        }
        assert_eq!(EffectKind::from_i32(3), None);
        assert_eq!(EffectKind::from_i32(-1), None);
    }

    #[test]
    fn test_empty_slot_is_inert() {
        let mut slot = EffectSlot::Empty;
        assert!(!slot.time_step(10.0));
        assert_eq!(slot, EffectSlot::Empty);
        assert_eq!(slot.state(), None);

        let mut list = DrawList::new();
        assert_eq!(slot.render(&Matrix4x4d::IDENTITY, &EffectStyle::default(), &mut list), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_time_step_moves_linearly() {
        let velocity = Vec3d::new(4.0, -2.0, 0.5);
        let mut slot = EffectSlot::damage(Vec3d::new(1.0, 1.0, 1.0), velocity);

        let before = slot.state().unwrap().position;
        slot.time_step(0.25);
        let after = slot.state().unwrap();

        assert_eq!(after.position, before + velocity * 0.25);
        assert_eq!(after.age, 0.25);
    }

    #[test]
    fn test_retires_on_first_step_past_lifespan() {
        for mut slot in [
            EffectSlot::explosion(Vec3d::ZERO, Vec3d::ZERO, 5.0),
            EffectSlot::damage(Vec3d::ZERO, Vec3d::ZERO),
        ] {
            // Ages 0.5, 1.0, 1.5, 2.0 - reaching the lifespan is not enough.
            for _ in 0..4 {
                assert!(!slot.time_step(0.5));
                assert!(slot.is_live());
            }
            assert!(slot.time_step(0.5));
            assert_eq!(slot.kind(), EffectKind::None);

            // Already empty: no second retirement.
            assert!(!slot.time_step(0.5));
        }
    }

    #[test]
    fn test_retires_once_with_uneven_steps() {
        for (steps, retiring_step) in [
            // Lands exactly on the lifespan, then just past it.
            (vec![1.9f32, 0.1, 1e-3, 0.5], 2),
            (vec![0.7, 0.7, 0.7, 0.7], 2),
            (vec![0.01, 5.0, 5.0], 1),
            (vec![2.0, 0.0, 0.0, 1e-3], 3),
        ] {
            for mut slot in [
                EffectSlot::explosion(Vec3d::ZERO, Vec3d::ZERO, 5.0),
                EffectSlot::damage(Vec3d::ZERO, Vec3d::ZERO),
            ] {
                let retirements: Vec<usize> = steps
                    .iter()
                    .enumerate()
                    .filter(|&(_, &dt)| slot.time_step(dt))
                    .map(|(i, _)| i)
                    .collect();
                assert_eq!(retirements, vec![retiring_step], "steps {steps:?}");
                assert!(!slot.is_live());
            }
        }
    }

    #[test]
    fn test_explosion_render_curve() {
        let mut slot = EffectSlot::explosion(Vec3d::ZERO, Vec3d::ZERO, 5.0);
        slot.time_step(0.5); // age / lifespan = 0.25, growth = 0.5

        let transform = Matrix4x4d::translation(Vec3d::new(0.0, 0.0, -100.0));
        let mut list = DrawList::new();
        assert_eq!(slot.render(&transform, &EffectStyle::default(), &mut list), 2);

        match list.commands() {
            [DrawCommand::Billboard { center, scale, color, texture }, DrawCommand::Sphere { scale: sphere_scale, segments, color: sphere_color, .. }] =>
            {
                assert_eq!(*center, Vec3d::new(0.0, 0.0, -100.0));
                assert_eq!(*scale, 5.0 + 5.0 * 29.0 * 0.5);
                assert_eq!(*sphere_scale, *scale);
                assert_eq!(color[3], 0.5);
                assert_eq!(sphere_color[3], 0.5);
                assert_eq!(*texture, EffectTexture::Halo);
                assert_eq!(*segments, 20);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn test_damage_render_fades() {
        let mut slot = EffectSlot::damage(Vec3d::X, Vec3d::ZERO);
        slot.time_step(1.5);

        let mut list = DrawList::new();
        assert_eq!(slot.render(&Matrix4x4d::IDENTITY, &EffectStyle::default(), &mut list), 1);
        assert_eq!(list.commands()[0].color()[3], 0.25);
        assert_eq!(list.commands()[0].position(), Vec3d::X);
        assert_eq!(list.commands()[0].texture(), EffectTexture::Smoke);
    }

    #[test]
    fn test_render_does_not_mutate() {
        let slot = EffectSlot::explosion(Vec3d::Y, Vec3d::X, 3.0);
        let copy = slot;
        let mut list = DrawList::new();
        slot.render(&Matrix4x4d::IDENTITY, &EffectStyle::default(), &mut list);
        assert_eq!(slot, copy);
    }
}
