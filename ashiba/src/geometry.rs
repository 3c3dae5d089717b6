//! Canvas geometry and mm/px scale utilities.
//!
//! The drawing canvas works in pixels, the scaffold in millimeters. Every
//! conversion between the two goes through an explicit `scale` (mm per px),
//! so nothing here depends on a global canvas setting.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! `#[derive(Serialize, Deserialize)]` lets serde generate the JSON mapping
//! for us. `Point` serializes as `{"x": .., "y": ..}`, which is exactly the
//! shape the drawing document stores.

use serde::{Deserialize, Serialize};

/// Millimeters per pixel on the default canvas (1 px = 10 mm).
pub const DEFAULT_SCALE: f64 = 10.0;

/// Default snapping grid in millimeters.
pub const DEFAULT_GRID_MM: f64 = 150.0;

/// A 2D point in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The line a span was drawn along, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanLine {
    pub start: Point,
    pub end: Point,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point, in pixels.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Both coordinates are finite (no NaN or infinity).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl SpanLine {
    #[inline]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Length of the line in pixels.
    #[inline]
    pub fn length_px(&self) -> f64 {
        distance(self.start, self.end)
    }

    /// Length of the line in millimeters at the given scale.
    #[inline]
    pub fn length_mm(&self, scale: f64) -> f64 {
        distance_mm(self.start, self.end, scale)
    }

    /// Angle of the line in degrees, in `[0, 360)`.
    #[inline]
    pub fn angle_degrees(&self) -> f64 {
        angle_degrees(self.start, self.end)
    }

    /// Linear interpolation along the line.
    ///
    /// `ratio` 0.0 is `start`, 1.0 is `end`. No clamping happens here; the
    /// span generator clamps before calling.
    #[inline]
    pub fn point_at(&self, ratio: f64) -> Point {
        Point::new(
            self.start.x + (self.end.x - self.start.x) * ratio,
            self.start.y + (self.end.y - self.start.y) * ratio,
        )
    }
}

/// Convert millimeters to pixels.
#[inline]
pub fn mm_to_px(mm: f64, scale: f64) -> f64 {
    mm / scale
}

/// Convert pixels to millimeters.
#[inline]
pub fn px_to_mm(px: f64, scale: f64) -> f64 {
    px * scale
}

/// Round a length to the nearest multiple of `grid_size` millimeters.
///
/// Ties round away from zero (`f64::round`), so with the default 150 mm
/// grid 75 snaps to 150 and -75 snaps to -150.
#[inline]
pub fn snap_to_grid_mm(mm: f64, grid_size: f64) -> f64 {
    (mm / grid_size).round() * grid_size
}

/// Snap a pixel-space point to a millimeter grid.
pub fn snap_point_to_grid(point: Point, grid_size: f64, scale: f64) -> Point {
    let snap = |px: f64| mm_to_px(snap_to_grid_mm(px_to_mm(px, scale), grid_size), scale);
    Point::new(snap(point.x), snap(point.y))
}

/// Euclidean distance between two points, in pixels.
#[inline]
pub fn distance(start: Point, end: Point) -> f64 {
    start.distance(end)
}

/// Euclidean distance between two pixel-space points, in millimeters.
#[inline]
pub fn distance_mm(start: Point, end: Point, scale: f64) -> f64 {
    px_to_mm(distance(start, end), scale)
}

/// Angle from `start` to `end` in degrees, normalized into `[0, 360)`.
///
/// Canvas space has y pointing down, so a downward line is 90°.
pub fn angle_degrees(start: Point, end: Point) -> f64 {
    let degrees = (end.y - start.y).atan2(end.x - start.x).to_degrees();
    if degrees >= 0.0 {
        return degrees;
    }
    // -1e-17 + 360.0 rounds to 360.0, which is outside the range
    let shifted = degrees + 360.0;
    if shifted >= 360.0 { 0.0 } else { shifted }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn mm_px_roundtrip() {
        for mm in [0.0, 1.0, 1800.0, 3601.0, -42.5, 1e9, 0.123456789] {
            for scale in [DEFAULT_SCALE, 1.0, 2.5, 0.3] {
                let back = px_to_mm(mm_to_px(mm, scale), scale);
                assert!(
                    (back - mm).abs() <= 1e-9 * mm.abs().max(1.0),
                    "{} at scale {} came back as {}",
                    mm,
                    scale,
                    back
                );
            }
        }
    }

    #[test]
    fn default_scale_is_ten_mm_per_px() {
        assert_eq!(mm_to_px(1800.0, DEFAULT_SCALE), 180.0);
        assert_eq!(px_to_mm(360.0, DEFAULT_SCALE), 3600.0);
    }

    #[test]
    fn snap_rounds_half_away_from_zero() {
        assert_eq!(snap_to_grid_mm(74.9, DEFAULT_GRID_MM), 0.0);
        assert_eq!(snap_to_grid_mm(75.0, DEFAULT_GRID_MM), 150.0);
        assert_eq!(snap_to_grid_mm(-75.0, DEFAULT_GRID_MM), -150.0);
        assert_eq!(snap_to_grid_mm(1840.0, DEFAULT_GRID_MM), 1800.0);
    }

    #[test]
    fn snap_is_idempotent() {
        for x in [-1000.3, -75.0, 0.0, 12.0, 149.99, 225.0, 1799.0, 123456.7] {
            for grid in [DEFAULT_GRID_MM, 10.0, 0.5, 300.0] {
                let once = snap_to_grid_mm(x, grid);
                assert_eq!(snap_to_grid_mm(once, grid), once);
            }
        }
    }

    #[test]
    fn snap_point_goes_through_mm() {
        // 7.6 px = 76 mm -> 150 mm -> 15 px
        let p = snap_point_to_grid(Point::new(7.6, 22.0), DEFAULT_GRID_MM, DEFAULT_SCALE);
        assert_eq!(p, Point::new(15.0, 15.0));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(distance(a, b), 5.0);
        assert_eq!(distance_mm(a, b, DEFAULT_SCALE), 50.0);
    }

    #[test]
    fn distance_of_huge_coordinates_stays_finite() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1e200, 1e200);
        let d = distance(a, b);
        assert!(d.is_finite());
        assert!((d / 1e200 - std::f64::consts::SQRT_2).abs() < EPS);
    }

    #[test]
    fn angle_is_normalized() {
        let o = Point::new(0.0, 0.0);
        assert!((angle_degrees(o, Point::new(10.0, 0.0)) - 0.0).abs() < EPS);
        assert!((angle_degrees(o, Point::new(0.0, 10.0)) - 90.0).abs() < EPS);
        assert!((angle_degrees(o, Point::new(-10.0, 0.0)) - 180.0).abs() < EPS);
        assert!((angle_degrees(o, Point::new(0.0, -10.0)) - 270.0).abs() < EPS);
        assert!((angle_degrees(o, Point::new(10.0, -10.0)) - 315.0).abs() < EPS);
    }

    #[test]
    fn point_at_interpolates() {
        let line = SpanLine::new(Point::new(10.0, 20.0), Point::new(30.0, 60.0));
        assert_eq!(line.point_at(0.0), line.start);
        assert_eq!(line.point_at(1.0), line.end);
        assert_eq!(line.point_at(0.5), Point::new(20.0, 40.0));
        assert_eq!(line.length_mm(DEFAULT_SCALE), line.length_px() * DEFAULT_SCALE);
    }
}
