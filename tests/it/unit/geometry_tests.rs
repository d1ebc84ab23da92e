//! Unit tests for the stroke geometry engine.

use crate::helpers::line;
use inkbook::geometry::{
    GeometryEngine, GeometryStrategy, OutlineOptions, WidthSmoother, stroke_outline, target_width,
};
use inkbook::render::CoverageMask;
use inkbook::types::StrokePoint;

#[test]
fn test_reference_widths_for_size_twenty() {
    let mut smoother = WidthSmoother::new(20.0);
    let first = smoother.next(0.5);
    let second = smoother.next(0.6);
    assert!((first - 16.22).abs() < 0.01, "first width {first}");
    assert!((second - 16.72).abs() < 0.05, "second width {second}");
}

#[test]
fn test_width_gap_shrinks_by_constant_factor() {
    let mut smoother = WidthSmoother::new(12.0);
    let target = target_width(1.0, 12.0);
    let mut gap = target - smoother.next(0.0);
    for _ in 0..10 {
        let next_gap = target - smoother.next(1.0);
        assert!((next_gap - 0.8 * gap).abs() < 1e-3);
        gap = next_gap;
    }
}

#[test]
fn test_two_point_stroke_covers_its_segment() {
    let points = line((20.0, 50.0), (120.0, 50.0), 2);
    for engine in [GeometryEngine::quadratic(), GeometryEngine::outline()] {
        let mut mask = CoverageMask::new(160, 100);
        let dirty = engine.rasterize(&points, 8.0, &mut mask).unwrap();
        assert!(mask.get(70, 50), "{:?} misses the middle", engine.strategy);
        assert!(!mask.get(70, 90));
        assert!(dirty.contains(70, 50));
    }
}

#[test]
fn test_heavier_pressure_covers_more() {
    let engine = GeometryEngine::quadratic();
    let light: Vec<StrokePoint> = line((10.0, 50.0), (150.0, 50.0), 20)
        .into_iter()
        .map(|p| StrokePoint::new(p.x, p.y, 0.1))
        .collect();
    let heavy: Vec<StrokePoint> = light
        .iter()
        .map(|p| StrokePoint::new(p.x, p.y, 1.0))
        .collect();

    let mut light_mask = CoverageMask::new(160, 100);
    let mut heavy_mask = CoverageMask::new(160, 100);
    engine.rasterize(&light, 10.0, &mut light_mask);
    engine.rasterize(&heavy, 10.0, &mut heavy_mask);
    assert!(heavy_mask.covered_count() > light_mask.covered_count());
}

#[test]
fn test_simulated_pressure_outline_fills_the_stroke() {
    let options = OutlineOptions {
        simulate_pressure: true,
        ..OutlineOptions::default()
    };
    let engine = GeometryEngine::new(GeometryStrategy::Outline, options);
    let points = line((10.0, 80.0), (150.0, 80.0), 30);

    let mut mask = CoverageMask::new(160, 160);
    assert!(engine.rasterize(&points, 8.0, &mut mask).is_some());
    assert!(mask.get(80, 80));
    assert!(!mask.get(80, 120));

    let outline = stroke_outline(&points, 8.0, &options);
    assert_eq!(outline, stroke_outline(&points, 8.0, &options));
    assert!(outline.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn test_zero_size_outline_stays_finite() {
    let points = line((10.0, 80.0), (150.0, 80.0), 12);
    for simulate_pressure in [false, true] {
        let options = OutlineOptions {
            simulate_pressure,
            ..OutlineOptions::default()
        };
        let outline = stroke_outline(&points, 0.0, &options);
        assert!(!outline.is_empty());
        assert!(
            outline.iter().all(|p| p.x.is_finite() && p.y.is_finite()),
            "non-finite vertex with simulate_pressure = {simulate_pressure}"
        );
    }
}
