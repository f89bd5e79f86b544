//! # Soak Run
//!
//! Drives the effect system through a synthetic star system for a fixed
//! number of ticks, then saves every frame and loads the stream into a fresh
//! copy of the system.
//!
//! ```text
//! root "system"
//!  ├─ planet-0 ── station-0
//!  ├─ planet-1 ── station-1
//!  ├─ planet-2 ── station-2
//!  └─ camera
//! ```
//!
//! One ship sits in each planet and station frame. Each tick the run walks
//! one sector further across the galaxy; the busier the sector, the more
//! effects spawn.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use starfall_galaxy::{GalaxyConfig, GalaxyError, GalaxyMap};
use starfall_sfx::{
    BodySnapshot, DrawList, EffectKind, EffectSystem, FrameGraph, FrameId, FrameTree, SaveReader,
    SaveWriter, SfxConfig, SfxError,
};
use starfall_shared::{Matrix4x4d, Vec3d};

/// Orbit radius of each planet frame around the root.
const PLANET_ORBITS: [f64; 3] = [1_000.0, 2_500.0, 6_000.0];

/// Station offset within its planet's frame.
const STATION_OFFSET: Vec3d = Vec3d::new(0.0, 50.0, 0.0);

/// Angular speed of the planet frames, radians per second.
const ORBIT_RATE: f64 = 0.1;

/// Sectors walked before the route wraps.
const SECTOR_ROUTE: u32 = 4096;

/// Errors that can end a soak run.
#[derive(Error, Debug)]
pub enum SoakError {
    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Galaxy map failure.
    #[error(transparent)]
    Galaxy(#[from] GalaxyError),

    /// Effect system failure.
    #[error(transparent)]
    Sfx(#[from] SfxError),

    /// The save file could not be written.
    #[error("could not write save file {path}: {reason}")]
    SaveFile {
        /// Path that was tried.
        path: String,
        /// Underlying I/O error.
        reason: String,
    },

    /// Bytes left over after every frame was read back.
    #[error("save stream has {0} trailing bytes")]
    TrailingBytes(usize),
}

/// Result type for soak runs.
pub type SoakResult<T> = Result<T, SoakError>;

/// Soak run settings.
///
/// ```toml
/// ticks = 600
/// time_step = 0.016666668
/// ships_per_tick = 4
/// save_path = "soak.sav"
///
/// [galaxy]
/// bitmap_path = "data/galaxy.png"
///
/// [sfx]
/// rng_seed = 42
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoakConfig {
    /// Galaxy map settings.
    pub galaxy: GalaxyConfig,
    /// Effect system settings.
    pub sfx: SfxConfig,
    /// Ticks to simulate.
    pub ticks: u32,
    /// Seconds per tick.
    pub time_step: f32,
    /// Spawns per tick in the densest sector.
    pub ships_per_tick: u32,
    /// Where to write the final save stream, if anywhere.
    pub save_path: Option<PathBuf>,
}

impl Default for SoakConfig {
    fn default() -> Self {
        Self {
            galaxy: GalaxyConfig::default(),
            sfx: SfxConfig::default(),
            ticks: 600,
            time_step: 1.0 / 60.0,
            ships_per_tick: 4,
            save_path: None,
        }
    }
}

impl SoakConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`SoakError::InvalidConfig`] on a parse error or a bad top-level value;
    /// nested sections report through their own error types.
    pub fn from_toml_str(text: &str) -> SoakResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| SoakError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// As [`SoakConfig::from_toml_str`], plus [`SoakError::InvalidConfig`] if
    /// the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> SoakResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SoakError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges, including the nested sections.
    ///
    /// # Errors
    ///
    /// The first problem found.
    pub fn validate(&self) -> SoakResult<()> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(SoakError::InvalidConfig(format!(
                "time_step must be finite and > 0, got {}",
                self.time_step
            )));
        }
        self.galaxy.validate()?;
        self.sfx.validate()?;
        Ok(())
    }
}

/// What a soak run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SoakReport {
    /// Ticks simulated.
    pub ticks: u32,
    /// Frames in the scene.
    pub frames: usize,
    /// Effects spawned.
    pub spawned: u64,
    /// Spawns dropped on full pools.
    pub dropped: u64,
    /// Effects that expired.
    pub retired: u64,
    /// Draw commands emitted over the whole run.
    pub draw_commands: u64,
    /// Most effects live at the end of any tick.
    pub peak_live: usize,
    /// Live effects when the run was saved.
    pub live_before: usize,
    /// Live effects after loading the save into a fresh scene.
    pub live_after: usize,
    /// Size of the save stream.
    pub save_bytes: usize,
}

/// Spawns for one tick: `ships_per_tick` scaled by `density / 255`, rounded
/// up, so any star at all gives at least one spawn.
#[must_use]
pub fn scaled_spawns(ships_per_tick: u32, density: u8) -> u32 {
    ships_per_tick
        .saturating_mul(u32::from(density))
        .div_ceil(u32::from(u8::MAX))
}

struct Scene {
    frames: FrameGraph,
    planets: Vec<(FrameId, f64)>,
    ships: Vec<BodySnapshot<FrameId>>,
    camera: FrameId,
}

impl Scene {
    fn build() -> Self {
        let mut frames = FrameGraph::new("system");
        let mut planets = Vec::with_capacity(PLANET_ORBITS.len());
        let mut ships = Vec::with_capacity(PLANET_ORBITS.len() * 2);

        for (i, &orbit) in PLANET_ORBITS.iter().enumerate() {
            let planet = frames.add_child(
                FrameGraph::ROOT,
                &format!("planet-{i}"),
                Matrix4x4d::translation(Vec3d::new(orbit, 0.0, 0.0)),
            );
            let station = frames.add_child(
                planet,
                &format!("station-{i}"),
                Matrix4x4d::translation(STATION_OFFSET),
            );
            planets.push((planet, orbit));
            for frame in [planet, station] {
                ships.push(BodySnapshot {
                    frame,
                    position: Vec3d::new(10.0, 0.0, 0.0),
                    velocity: Vec3d::new(0.0, 0.0, 5.0),
                    bounding_radius: 20.0,
                });
            }
        }

        let camera = frames.add_child(
            FrameGraph::ROOT,
            "camera",
            Matrix4x4d::translation(Vec3d::new(0.0, 500.0, -8_000.0)),
        );

        Self {
            frames,
            planets,
            ships,
            camera,
        }
    }

    /// Places every planet `seconds` into its orbit.
    fn advance_orbits(&mut self, seconds: f64) {
        let angle = seconds * ORBIT_RATE;
        for &(planet, orbit) in &self.planets {
            let local = Matrix4x4d::rotation_y(angle)
                * Matrix4x4d::translation(Vec3d::new(orbit, 0.0, 0.0));
            self.frames.set_local_transform(planet, local);
        }
    }

    fn live_effects(&self) -> usize {
        self.frames
            .frames()
            .map(|frame| self.frames.effects(frame).live_count())
            .sum()
    }
}

/// Sector visited on `tick`: a diagonal walk through the galaxy.
fn sector_for_tick(tick: u32) -> (i32, i32) {
    let step = i32::try_from(tick % SECTOR_ROUTE).unwrap_or(0);
    let sx = step - 2048;
    (sx, sx / 2)
}

/// Runs the soak described by `config` against `map`.
///
/// # Errors
///
/// - [`SoakError::InvalidConfig`] if `config` fails validation
/// - [`SoakError::SaveFile`] if `save_path` is set and cannot be written
/// - [`SoakError::Sfx`] or [`SoakError::TrailingBytes`] if the save stream
///   does not load back
pub fn run_soak(config: &SoakConfig, map: &GalaxyMap) -> SoakResult<SoakReport> {
    config.validate()?;

    let mut scene = Scene::build();
    let mut sfx = EffectSystem::new(config.sfx.clone());
    let mut draw_list = DrawList::with_capacity(1024);
    let mut report = SoakReport {
        ticks: config.ticks,
        frames: scene.frames.len(),
        ..SoakReport::default()
    };

    info!(
        "Soak starting: {} ticks of {}s, {} frames",
        config.ticks,
        config.time_step,
        report.frames
    );

    for tick in 0..config.ticks {
        let (sx, sy) = sector_for_tick(tick);
        let spawns = scaled_spawns(config.ships_per_tick, map.density(sx, sy));

        for i in 0..spawns {
            let ship = &scene.ships[tick.wrapping_add(i) as usize % scene.ships.len()];
            let kind = if i % 4 == 3 {
                EffectKind::Explosion
            } else {
                EffectKind::Damage
            };
            sfx.spawn(&mut scene.frames, ship, kind);
        }

        scene.advance_orbits(f64::from(tick) * f64::from(config.time_step));
        sfx.time_step_all(&mut scene.frames, config.time_step, FrameGraph::ROOT);

        draw_list.clear();
        sfx.render_all(&scene.frames, FrameGraph::ROOT, scene.camera, &mut draw_list);
        report.draw_commands += draw_list.len() as u64;
        report.peak_live = report.peak_live.max(scene.live_effects());
    }

    let mut writer = SaveWriter::new();
    for frame in scene.frames.frames() {
        let written = sfx.serialize(&scene.frames, frame, &mut writer);
        debug!("Saved {} effects from {}", written, scene.frames.name(frame));
    }
    report.live_before = scene.live_effects();
    report.save_bytes = writer.len();
    let bytes = writer.into_bytes();

    if let Some(path) = &config.save_path {
        std::fs::write(path, &bytes).map_err(|e| SoakError::SaveFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        info!("Save written to {} ({} bytes)", path.display(), bytes.len());
    }

    let mut restored = Scene::build();
    let mut reader = SaveReader::new(&bytes);
    for frame in restored.frames.frames() {
        sfx.deserialize(&mut reader, &mut restored.frames, frame)?;
    }
    if reader.remaining() != 0 {
        return Err(SoakError::TrailingBytes(reader.remaining()));
    }
    report.live_after = restored.live_effects();

    let stats = sfx.stats();
    report.spawned = stats.spawned;
    report.dropped = stats.dropped;
    report.retired = stats.retired;

    info!(
        "Soak finished: {} spawned, {} dropped, {} retired, live {} -> {} after reload",
        report.spawned,
        report.dropped,
        report.retired,
        report.live_before,
        report.live_after
    );
    Ok(report)
}
