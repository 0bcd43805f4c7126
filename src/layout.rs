use crate::core::{BezPath, Point};

/// Fixed phase step for the curl-radius oscillation. Chosen so the pattern
/// does not visibly repeat over the curl counts in use (9-26).
pub const CURL_PHASE: f64 = 2.7;

/// Parameters for one elliptical arc of curls.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArcSpec {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    pub start_deg: f64,
    pub end_deg: f64,
    pub count: usize,
    pub min_radius: f64,
    pub max_radius: f64,
}

/// One decorative curl: a circle placed along an arc.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurlPrimitive {
    pub center: Point,
    pub radius: f64,
}

/// Places `spec.count` curls evenly spaced in angle between `start_deg` and
/// `end_deg` (linear interpolation, no easing) on the given ellipse.
///
/// Pure: identical inputs always produce the identical ordered sequence.
/// `count == 0` yields an empty sequence and `count == 1` is defined as a
/// single curl at `start_deg`, so no input divides by zero.
pub fn generate_arc(spec: &ArcSpec) -> Vec<CurlPrimitive> {
    if spec.count == 0 {
        return Vec::new();
    }

    (0..spec.count)
        .map(|index| {
            let t = if spec.count == 1 {
                0.0
            } else {
                index as f64 / (spec.count - 1) as f64
            };
            let deg = spec.start_deg + (spec.end_deg - spec.start_deg) * t;
            let rad = deg.to_radians();
            let center = Point::new(
                spec.center.x + spec.radius_x * rad.cos(),
                spec.center.y + spec.radius_y * rad.sin(),
            );
            let oscillation = 0.5 + 0.5 * (index as f64 * CURL_PHASE).sin();
            let radius = spec.min_radius + (spec.max_radius - spec.min_radius) * oscillation;
            CurlPrimitive { center, radius }
        })
        .collect()
}

/// An Archimedean spiral polyline winding `turns` full revolutions outward
/// from `center` to `max_radius`. Used for the dizzy eye overlays; the
/// opposing spin comes from rotating the finished path, not from here.
pub fn generate_spiral(center: Point, turns: f64, max_radius: f64, samples: usize) -> BezPath {
    let mut path = BezPath::new();
    if samples == 0 {
        return path;
    }

    path.move_to(center);
    for i in 1..=samples {
        let t = i as f64 / samples as f64;
        let angle = turns * std::f64::consts::TAU * t;
        let r = max_radius * t;
        path.line_to(Point::new(
            center.x + r * angle.cos(),
            center.y + r * angle.sin(),
        ));
    }
    path
}
