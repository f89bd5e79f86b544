//! End-to-end soak runs against an in-memory galaxy map.

use starfall::galaxy::{DensityBitmap, GalaxyConfig, GalaxyError, GalaxyMap};
use starfall::sfx::{SaveReader, COUNT_SIZE, RECORD_SIZE};
use starfall::{run_soak, SoakConfig};

fn uniform_map(density: u8) -> GalaxyMap {
    let bitmap = DensityBitmap::from_raw(8, 8, 8, vec![density; 64]).unwrap();
    GalaxyMap::from_bitmap(GalaxyConfig::default(), bitmap).unwrap()
}

fn temp_save_path() -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("starfall_soak_{id}.sav"))
}

#[test]
fn test_soak_reload_preserves_live_count() {
    let config = SoakConfig {
        ticks: 90,
        ..SoakConfig::default()
    };
    let report = run_soak(&config, &uniform_map(255)).unwrap();

    assert_eq!(report.frames, 8);
    // Four spawns per tick in the densest sector, nothing dropped.
    assert_eq!(report.spawned, 90 * 4);
    assert_eq!(report.dropped, 0);
    assert!(report.live_before > 0);
    assert_eq!(report.live_before, report.live_after);
    assert_eq!(
        report.save_bytes,
        report.frames * COUNT_SIZE + report.live_before * RECORD_SIZE
    );
    assert!(report.draw_commands > 0);
}

#[test]
fn test_soak_retires_old_effects() {
    // 1.5 s per tick: every effect is gone two ticks after it spawned.
    let config = SoakConfig {
        ticks: 20,
        time_step: 1.5,
        ..SoakConfig::default()
    };
    let report = run_soak(&config, &uniform_map(255)).unwrap();
    assert!(report.retired > 0);
    assert!(report.peak_live <= 2 * 4);
    assert_eq!(report.spawned, report.retired + report.live_before as u64);
}

#[test]
fn test_empty_galaxy_spawns_nothing() {
    let config = SoakConfig {
        ticks: 30,
        ..SoakConfig::default()
    };
    let report = run_soak(&config, &uniform_map(0)).unwrap();
    assert_eq!(report.spawned, 0);
    assert_eq!(report.draw_commands, 0);
    assert_eq!(report.live_after, 0);
    assert_eq!(report.save_bytes, report.frames * COUNT_SIZE);
}

#[test]
fn test_same_seed_same_save() {
    let path_a = temp_save_path();
    let path_b = path_a.with_extension("b.sav");
    let map = uniform_map(200);

    for path in [&path_a, &path_b] {
        let config = SoakConfig {
            ticks: 45,
            save_path: Some(path.clone()),
            ..SoakConfig::default()
        };
        run_soak(&config, &map).unwrap();
    }

    let a = std::fs::read(&path_a).unwrap();
    let b = std::fs::read(&path_b).unwrap();
    std::fs::remove_file(&path_a).ok();
    std::fs::remove_file(&path_b).ok();

    assert_eq!(a, b);
    // The file starts with the root frame's block.
    let mut reader = SaveReader::new(&a);
    assert!(reader.read_i32().unwrap() >= 0);
}

#[test]
fn test_missing_bitmap_is_reported() {
    let config = GalaxyConfig {
        bitmap_path: "/definitely/not/here/galaxy.png".into(),
        ..GalaxyConfig::default()
    };
    match GalaxyMap::open(&config) {
        Err(GalaxyError::MissingBitmap { path, .. }) => {
            assert!(path.ends_with("galaxy.png"));
        }
        other => panic!("expected MissingBitmap, got {other:?}"),
    }
}
