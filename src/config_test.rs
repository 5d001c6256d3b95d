#![allow(clippy::float_cmp)]

use super::*;

/// # Safety
/// Tests touching the environment share process state; every test that sets a
/// variable clears all of them first and last.
unsafe fn clear_geom_env() {
    unsafe {
        std::env::remove_var(ENV_GRID_SIZE);
        std::env::remove_var(ENV_SNAP_THRESHOLD);
        std::env::remove_var(ENV_SELECTION_PADDING);
        std::env::remove_var(ENV_GUIDE_OUTSET);
        std::env::remove_var(ENV_NEIGHBOR_RADIUS);
        std::env::remove_var(ENV_LAYOUT_SPACING);
    }
}

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[test]
fn default_matches_constants() {
    let cfg = GeometryConfig::default();
    assert_eq!(cfg.grid_size, 500.0);
    assert_eq!(cfg.snap_threshold, 10.0);
    assert_eq!(cfg.selection_padding, 20.0);
    assert_eq!(cfg.guide_outset, 20.0);
    assert_eq!(cfg.neighbor_radius, 500.0);
    assert_eq!(cfg.layout_spacing, 10.0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn from_env_uses_defaults_when_unset() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe { clear_geom_env() };

    let cfg = GeometryConfig::from_env().unwrap();
    assert_eq!(cfg, GeometryConfig::default());
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_geom_env();
        std::env::set_var(ENV_GRID_SIZE, "250");
        std::env::set_var(ENV_SNAP_THRESHOLD, " 6.5 ");
        std::env::set_var(ENV_NEIGHBOR_RADIUS, "120");
        std::env::set_var(ENV_LAYOUT_SPACING, "24");
    }

    let cfg = GeometryConfig::from_env().unwrap();
    assert_eq!(cfg.grid_size, 250.0);
    assert_eq!(cfg.snap_threshold, 6.5);
    assert_eq!(cfg.neighbor_radius, 120.0);
    assert_eq!(cfg.layout_spacing, 24.0);
    assert_eq!(cfg.selection_padding, SELECTION_PADDING);

    unsafe { clear_geom_env() };
}

#[test]
fn from_env_rejects_garbage() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_geom_env();
        std::env::set_var(ENV_SNAP_THRESHOLD, "ten");
    }

    let err = GeometryConfig::from_env().unwrap_err();
    assert_eq!(err, GeometryError::ConfigParse { key: ENV_SNAP_THRESHOLD.into(), raw: "ten".into() });
    assert_eq!(err.error_code(), "E_CONFIG_PARSE");

    unsafe { clear_geom_env() };
}

#[test]
fn from_env_rejects_zero_grid() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_geom_env();
        std::env::set_var(ENV_GRID_SIZE, "0");
    }

    let err = GeometryConfig::from_env().unwrap_err();
    assert_eq!(err, GeometryError::InvalidGridSize(0.0));

    unsafe { clear_geom_env() };
}

#[test]
fn validate_rejects_negative_threshold() {
    let cfg = GeometryConfig { snap_threshold: -1.0, ..GeometryConfig::default() };
    let err = cfg.validate().unwrap_err();
    assert_eq!(err, GeometryError::InvalidDistance { name: "snap_threshold", value: -1.0 });
    assert_eq!(err.error_code(), "E_INVALID_DISTANCE");
}

#[test]
fn validate_rejects_nan_grid() {
    let cfg = GeometryConfig { grid_size: f64::NAN, ..GeometryConfig::default() };
    assert!(matches!(cfg.validate(), Err(GeometryError::InvalidGridSize(_))));
}

#[test]
fn deserialize_partial_json_fills_defaults() {
    let cfg: GeometryConfig = serde_json::from_str(r#"{"grid_size": 1000}"#).unwrap();
    assert_eq!(cfg.grid_size, 1000.0);
    assert_eq!(cfg.snap_threshold, DEFAULT_SNAP_THRESHOLD);
}
