//! # Starfall Soak
//!
//! Headless run of the effect system against the galaxy density map.
//!
//! Usage: `starfall_soak [config.toml]`
//!
//! Without a config file the defaults are used, which expect the density
//! bitmap at `data/galaxy.png`. The process exits with status 1 if the
//! bitmap cannot be opened.
//!
//! Log level comes from `RUST_LOG` (default `info`).

use std::process::ExitCode;

use starfall::galaxy::GalaxyMap;
use starfall::{run_soak, SoakConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SoakConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => SoakConfig::default(),
    };

    // The density map is a hard startup dependency.
    let map = match GalaxyMap::open(&config.galaxy) {
        Ok(map) => map,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = run_soak(&config, &map);
    map.shutdown();

    match result {
        Ok(report) => {
            info!(
                "{} ticks, {} frames, {} draw commands, peak {} live, save {} bytes",
                report.ticks,
                report.frames,
                report.draw_commands,
                report.peak_live,
                report.save_bytes
            );
            if report.live_before == report.live_after {
                ExitCode::SUCCESS
            } else {
                error!(
                    "Reload mismatch: {} live before save, {} after",
                    report.live_before, report.live_after
                );
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("Soak failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
