//! Unit tests for coordinate mapping and scale-to-fit.

use inkbook::input::{
    CoordinateMapper, DisplayRect, LogicalSize, PointerEvent, Viewport, resolve_pressure,
};

#[test]
fn test_fit_scale_limited_by_height() {
    let viewport = Viewport::new(1.0, LogicalSize::default());
    let scale = viewport.fit_scale(1000.0, 800.0);
    assert!((scale - (800.0 - 120.0) / 1123.0).abs() < 1e-5);
}

#[test]
fn test_fit_scale_never_enlarges() {
    let viewport = Viewport::new(1.0, LogicalSize::default());
    assert_eq!(viewport.fit_scale(4000.0, 4000.0), 1.0);
}

#[test]
fn test_fit_scale_has_a_floor() {
    let viewport = Viewport::new(1.0, LogicalSize::default());
    assert_eq!(viewport.fit_scale(50.0, 50.0), 0.1);
}

#[test]
fn test_points_are_recorded_in_logical_space() {
    // Page shown at half size: every device pixel spans two logical units.
    let mapper = Viewport::new(0.5, LogicalSize::default()).mapper(20.0, 10.0);
    let point = mapper
        .map_event(&PointerEvent::pen(7, 20.0 + 100.0, 10.0 + 50.0, 0.8))
        .unwrap();
    assert!((point.x - 200.0).abs() < 1e-3);
    assert!((point.y - 100.0).abs() < 1e-3);
    assert!((point.pressure - 0.8).abs() < 1e-6);
}

#[test]
fn test_zero_area_display_maps_nothing() {
    let mapper = CoordinateMapper::new(LogicalSize::default(), DisplayRect::new(0.0, 0.0, 0.0, 300.0));
    assert!(mapper.map(10.0, 10.0).is_none());
    assert!(mapper.map_event(&PointerEvent::mouse(10.0, 10.0)).is_none());
}

#[test]
fn test_missing_pressure_defaults_to_half() {
    assert_eq!(resolve_pressure(None), 0.5);
    assert_eq!(resolve_pressure(Some(f32::NAN)), 0.5);
    assert_eq!(resolve_pressure(Some(1.7)), 1.0);
    assert_eq!(resolve_pressure(Some(0.0)), 0.0);
}
