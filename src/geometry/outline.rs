//! Variable-width outline polygon generation.
//!
//! Raw samples are first streamlined into a centre line (each point is pulled
//! only part of the way toward the new sample), then offset to both sides by a
//! pressure-dependent radius. The polygon is: start cap, left side, end cap,
//! right side reversed.

use super::Vec2;
use crate::constants::{
    CAP_SEGMENTS, DEFAULT_SMOOTHING, DEFAULT_STREAMLINE, DEFAULT_THINNING, RATE_OF_PRESSURE_CHANGE,
};
use crate::types::StrokePoint;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Shape parameters for the outline strategy. The size comes from the stroke.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutlineOptions {
    /// Effect of pressure on radius; 0 gives a constant width
    pub thinning: f32,
    /// Minimum outline vertex spacing as a fraction of the size
    pub smoothing: f32,
    /// How far the centre line lags behind input, 0..1
    pub streamline: f32,
    /// Derive pressure from drawing speed instead of the recorded values
    pub simulate_pressure: bool,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            thinning: DEFAULT_THINNING,
            smoothing: DEFAULT_SMOOTHING,
            streamline: DEFAULT_STREAMLINE,
            simulate_pressure: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct CentrePoint {
    point: Vec2,
    pressure: f32,
    /// Unit vector pointing back toward the previous centre point
    vector: Vec2,
    distance: f32,
}

fn centre_line(points: &[StrokePoint], size: f32, streamline: f32) -> Vec<CentrePoint> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let t = 0.15 + (1.0 - streamline.clamp(0.0, 1.0)) * 0.85;
    let last_index = points.len() - 1;

    let mut line = vec![CentrePoint {
        point: Vec2::from(first),
        pressure: first.pressure,
        vector: Vec2::new(1.0, 1.0).unit(),
        distance: 0.0,
    }];
    let mut previous = Vec2::from(first);
    let mut running_length = 0.0;
    let mut reached_min_length = false;

    for (i, raw) in points.iter().enumerate().skip(1) {
        let target = Vec2::from(raw);
        let point = if i == last_index { target } else { previous.lerp(target, t) };
        if point == previous {
            continue;
        }

        let distance = point.dist(previous);
        running_length += distance;

        // The first few samples of a stroke are noise until it has some length.
        if i < last_index && !reached_min_length {
            if running_length < size {
                continue;
            }
            reached_min_length = true;
        }

        line.push(CentrePoint {
            point,
            pressure: raw.pressure,
            vector: (previous - point).unit(),
            distance,
        });
        previous = point;
    }

    if line.len() > 1 {
        line[0].vector = line[1].vector;
    }
    line
}

fn radius_for(size: f32, thinning: f32, pressure: f32) -> f32 {
    let radius = if thinning == 0.0 {
        size * 0.5
    } else {
        size * (0.5 - thinning * (0.5 - pressure))
    };
    radius.max(0.01)
}

fn round_cap(centre: Vec2, from_offset: Vec2) -> impl Iterator<Item = Vec2> {
    (0..=CAP_SEGMENTS).map(move |k| {
        let angle = PI * k as f32 / CAP_SEGMENTS as f32;
        centre + from_offset.rotate(angle)
    })
}

/// Closed outline polygon for a stroke. Empty when there are no points.
pub fn stroke_outline(points: &[StrokePoint], size: f32, options: &OutlineOptions) -> Vec<Vec2> {
    let line = centre_line(points, size, options.streamline);
    if line.is_empty() {
        return Vec::new();
    }

    let min_distance = (size * options.smoothing).powi(2);
    let mut previous_pressure = line[0].pressure;
    let mut left: Vec<Vec2> = Vec::with_capacity(line.len());
    let mut right: Vec<Vec2> = Vec::with_capacity(line.len());
    let mut offsets: Vec<Vec2> = Vec::with_capacity(line.len());

    for (i, cp) in line.iter().enumerate() {
        let pressure = if options.simulate_pressure {
            let speed = (cp.distance / size.max(f32::EPSILON)).min(1.0);
            let rest = (1.0 - speed).min(1.0);
            (previous_pressure + (rest - previous_pressure) * (speed * RATE_OF_PRESSURE_CHANGE))
                .min(1.0)
        } else {
            cp.pressure
        };
        previous_pressure = pressure;

        let radius = radius_for(size, options.thinning, pressure);
        let next_vector = line.get(i + 1).map_or(cp.vector, |next| next.vector);
        let blend = next_vector.dot(cp.vector);
        let direction = next_vector.lerp(cp.vector, blend).unit();
        let direction = if direction == Vec2::default() { cp.vector } else { direction };
        let offset = direction.perp() * radius;
        offsets.push(offset);

        let l = cp.point - offset;
        let r = cp.point + offset;
        let keep_left = i <= 1 || left.last().is_none_or(|last| last.dist_sq(l) > min_distance);
        let keep_right = i <= 1 || right.last().is_none_or(|last| last.dist_sq(r) > min_distance);
        if keep_left {
            left.push(l);
        }
        if keep_right {
            right.push(r);
        }
    }

    let first = &line[0];
    let last = &line[line.len() - 1];
    let first_offset = offsets[0];
    let last_offset = offsets[offsets.len() - 1];

    let mut polygon = Vec::with_capacity(left.len() + right.len() + 2 * (CAP_SEGMENTS + 1));
    polygon.extend(round_cap(first.point, first_offset));
    polygon.extend(left);
    polygon.extend(round_cap(last.point, last_offset * -1.0));
    polygon.extend(right.into_iter().rev());
    polygon
}
