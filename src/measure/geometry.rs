//! Measurement formulas in image-space pixels.
//!
//! Everything here is a pure function of the input points. Degenerate input
//! (coincident points, zero spans) yields zero-valued results instead of NaN.

use std::f32::consts::PI;

use bevy::math::Vec2;

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Sum of consecutive segment lengths of an open chain.
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Sum of edge lengths of a closed ring (last point connects back to the
/// first). Rings of fewer than 3 points have no perimeter.
pub fn polygon_perimeter(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    cyclic_pairs(points).map(|(a, b)| distance(a, b)).sum()
}

/// Shoelace area of a simple ring. Rings of fewer than 3 points have no area.
pub fn polygon_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice_signed: f32 = cyclic_pairs(points).map(|(a, b)| a.x * b.y - b.x * a.y).sum();
    twice_signed.abs() / 2.0
}

fn cyclic_pairs(points: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| (p, points[(i + 1) % points.len()]))
}

/// Angle at `vertex` between the rays towards `a` and `b`, in degrees.
///
/// A zero-length ray makes the angle 0.
pub fn angle_degrees(a: Vec2, vertex: Vec2, b: Vec2) -> f32 {
    let v1 = a - vertex;
    let v2 = b - vertex;
    let len1 = v1.length();
    let len2 = v2.length();
    if len1 <= 0.0 || len2 <= 0.0 {
        return 0.0;
    }
    let cos = (v1.dot(v2) / (len1 * len2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleMetrics {
    pub center: Vec2,
    pub radius: f32,
    pub diameter: f32,
    pub circumference: f32,
}

impl CircleMetrics {
    pub fn from_center_edge(center: Vec2, edge: Vec2) -> Self {
        let radius = distance(center, edge);
        Self {
            center,
            radius,
            diameter: 2.0 * radius,
            circumference: 2.0 * PI * radius,
        }
    }
}

/// Axis-aligned rectangle spanned by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectMetrics {
    pub min: Vec2,
    pub width: f32,
    pub height: f32,
    pub perimeter: f32,
    pub area: f32,
}

impl RectMetrics {
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let width = (b.x - a.x).abs();
        let height = (b.y - a.y).abs();
        Self {
            min: a.min(b),
            width,
            height,
            perimeter: 2.0 * (width + height),
            area: width * height,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size() / 2.0
    }
}

/// Ellipse inscribed in the bounding box spanned by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseMetrics {
    pub center: Vec2,
    /// Horizontal semi-axis.
    pub a: f32,
    /// Vertical semi-axis.
    pub b: f32,
    pub perimeter: f32,
    pub area: f32,
}

impl EllipseMetrics {
    pub fn from_corners(p0: Vec2, p1: Vec2) -> Self {
        let bounds = RectMetrics::from_corners(p0, p1);
        let a = bounds.width / 2.0;
        let b = bounds.height / 2.0;
        Self {
            center: bounds.center(),
            a,
            b,
            perimeter: ramanujan_perimeter(a, b),
            area: PI * a * b,
        }
    }
}

/// Ramanujan's second approximation of an ellipse perimeter.
pub fn ramanujan_perimeter(a: f32, b: f32) -> f32 {
    let sum = a + b;
    if sum <= 0.0 {
        return 0.0;
    }
    let h = ((a - b) / sum).powi(2);
    PI * sum * (1.0 + (3.0 * h) / (10.0 + (4.0 - 3.0 * h).sqrt()))
}

/// Splits `from → to` into the visible pieces of a dashed stroke, starting
/// with a dash. The last piece is clipped to the segment end.
pub fn dashed_segments(from: Vec2, to: Vec2, dash: f32, gap: f32) -> Vec<(Vec2, Vec2)> {
    let length = distance(from, to);
    if length <= 0.0 || dash <= 0.0 {
        return Vec::new();
    }
    let direction = (to - from) / length;
    let gap = gap.max(0.0);

    let mut pieces = Vec::new();
    let mut travelled = 0.0;
    let mut drawing = true;
    while travelled < length {
        let step = if drawing { dash } else { gap }.min(length - travelled);
        if drawing {
            let start = from + direction * travelled;
            pieces.push((start, start + direction * step));
        }
        travelled += step;
        drawing = !drawing;
    }
    pieces
}
