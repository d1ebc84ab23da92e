//! Unit tests for settings persistence.

use inkbook::geometry::GeometryStrategy;
use inkbook::input::SchedulePolicy;
use inkbook::settings::InkSettings;
use inkbook::types::Color;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_empty_object_is_all_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{}").unwrap();
    assert_eq!(InkSettings::load_from(&path).unwrap(), InkSettings::default());
}

#[test]
fn test_missing_file_is_an_error_for_explicit_paths() {
    let dir = tempdir().unwrap();
    assert!(InkSettings::load_from(dir.path().join("absent.json")).is_err());
}

#[test]
fn test_geometry_engine_follows_settings() {
    let settings = InkSettings {
        geometry: GeometryStrategy::Outline,
        ..InkSettings::default()
    };
    let engine = settings.geometry_engine();
    assert_eq!(engine.strategy, GeometryStrategy::Outline);
    assert_eq!(engine.outline, settings.outline);
}

#[test]
fn test_hand_edited_values_are_sanitized() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r##"{"toolSize": 0.1, "undoLimit": 0, "schedule": "perEvent", "palette": ["#fff"]}"##,
    )
    .unwrap();

    let settings = InkSettings::load_from(&path).unwrap();
    assert_eq!(settings.tool_size, 1.0);
    assert_eq!(settings.undo_limit, 1);
    assert_eq!(settings.schedule, SchedulePolicy::PerEvent);
    assert_eq!(settings.palette, vec![Color::WHITE]);
}

#[test]
fn test_bad_color_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"penColor": "blue"}"#).unwrap();
    assert!(InkSettings::load_from(&path).is_err());
}
