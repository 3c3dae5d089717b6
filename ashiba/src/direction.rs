//! Direction rules for scaffold members.
//!
//! Directions are measured the way the part renderer reads them: 0° is
//! right, 90° up, 180° left, 270° down (counter-clockwise on screen). Canvas
//! angles from [`angle_degrees`] grow the other way because y points down,
//! so spans are mirrored into this convention first.
//!
//! Members sit a quarter turn clockwise from the span they support: a
//! rightward span gets downward members (270°), a downward span leftward
//! ones (180°). `reversed` moves them to the other side of the span.

use crate::geometry::{Point, angle_degrees};

/// The four directions a member can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    Right,
    Up,
    Left,
    Down,
}

impl Cardinal {
    /// All cardinals in ascending degree order.
    pub fn all() -> &'static [Cardinal] {
        &[Cardinal::Right, Cardinal::Up, Cardinal::Left, Cardinal::Down]
    }

    /// Bucket an arbitrary angle into its nearest cardinal.
    ///
    /// Intervals are half-open: `[315, 360) ∪ [0, 45)` is Right,
    /// `[45, 135)` Up, `[135, 225)` Left, `[225, 315)` Down.
    pub fn from_degrees(direction: f64) -> Self {
        let d = normalize_degrees(direction);
        if d >= 315.0 || d < 45.0 {
            Cardinal::Right
        } else if d < 135.0 {
            Cardinal::Up
        } else if d < 225.0 {
            Cardinal::Left
        } else {
            Cardinal::Down
        }
    }

    pub fn degrees(&self) -> f64 {
        match self {
            Cardinal::Right => 0.0,
            Cardinal::Up => 90.0,
            Cardinal::Left => 180.0,
            Cardinal::Down => 270.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Cardinal::Right => "right",
            Cardinal::Up => "up",
            Cardinal::Left => "left",
            Cardinal::Down => "down",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Cardinal::Right => Cardinal::Left,
            Cardinal::Up => Cardinal::Down,
            Cardinal::Left => Cardinal::Right,
            Cardinal::Down => Cardinal::Up,
        }
    }
}

impl std::fmt::Display for Cardinal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Wrap any angle into `[0, 360)`.
#[inline]
pub fn normalize_degrees(direction: f64) -> f64 {
    let d = direction.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if d >= 360.0 { 0.0 } else { d }
}

/// Member direction for a span from `start` to `end`, in `[0, 360)`.
///
/// Not snapped to a cardinal; use [`round_to_cardinal_direction`] for that.
pub fn calculate_direction(start: Point, end: Point, reversed: bool) -> f64 {
    let span_angle = normalize_degrees(360.0 - angle_degrees(start, end));
    let mut direction = span_angle - 90.0;
    if direction < 0.0 {
        direction += 360.0;
    }
    if reversed {
        direction = (direction + 180.0) % 360.0;
    }
    direction
}

/// Snap a direction to 0, 90, 180 or 270.
#[inline]
pub fn round_to_cardinal_direction(direction: f64) -> f64 {
    Cardinal::from_degrees(direction).degrees()
}

/// Human-readable label for a direction, after cardinal rounding.
#[inline]
pub fn direction_to_text(direction: f64) -> &'static str {
    Cardinal::from_degrees(direction).label()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn rightward_span_points_members_down() {
        let d = calculate_direction(p(0.0, 0.0), p(100.0, 0.0), false);
        assert!((d - 270.0).abs() < EPS, "got {}", d);
        assert_eq!(direction_to_text(d), "down");
    }

    #[test]
    fn downward_span_points_members_left() {
        let d = calculate_direction(p(0.0, 0.0), p(0.0, 100.0), false);
        assert!((d - 180.0).abs() < EPS, "got {}", d);
        assert_eq!(direction_to_text(d), "left");
    }

    #[test]
    fn reversed_flips_half_a_turn() {
        let d = calculate_direction(p(0.0, 0.0), p(100.0, 0.0), true);
        assert!((d - 90.0).abs() < EPS, "got {}", d);

        let d = calculate_direction(p(0.0, 0.0), p(0.0, 100.0), true);
        assert!(d.abs() < EPS, "got {}", d);
    }

    #[test]
    fn direction_stays_in_range() {
        let o = p(5.0, 5.0);
        for i in 0..72 {
            let a = (i as f64 * 5.0).to_radians();
            let end = p(o.x + a.cos() * 50.0, o.y + a.sin() * 50.0);
            for reversed in [false, true] {
                let d = calculate_direction(o, end, reversed);
                assert!((0.0..360.0).contains(&d), "{} out of range", d);
            }
        }
    }

    #[test]
    fn cardinal_boundaries() {
        assert_eq!(round_to_cardinal_direction(0.0), 0.0);
        assert_eq!(round_to_cardinal_direction(44.999), 0.0);
        assert_eq!(round_to_cardinal_direction(45.0), 90.0);
        assert_eq!(round_to_cardinal_direction(134.999), 90.0);
        assert_eq!(round_to_cardinal_direction(135.0), 180.0);
        assert_eq!(round_to_cardinal_direction(225.0), 270.0);
        assert_eq!(round_to_cardinal_direction(314.999), 270.0);
        assert_eq!(round_to_cardinal_direction(315.0), 0.0);
        assert_eq!(round_to_cardinal_direction(359.999), 0.0);
    }

    #[test]
    fn cardinal_handles_out_of_range_input() {
        assert_eq!(round_to_cardinal_direction(360.0), 0.0);
        assert_eq!(round_to_cardinal_direction(450.0), 90.0);
        assert_eq!(round_to_cardinal_direction(-90.0), 270.0);
        assert_eq!(round_to_cardinal_direction(-1e-20), 0.0);
        assert_eq!(round_to_cardinal_direction(-720.0 - 170.0), 180.0);
    }

    #[test]
    fn cardinal_rounding_is_total_and_idempotent() {
        let mut d = -1000.0;
        while d < 1000.0 {
            let once = round_to_cardinal_direction(d);
            assert!([0.0, 90.0, 180.0, 270.0].contains(&once), "{} -> {}", d, once);
            assert_eq!(round_to_cardinal_direction(once), once);
            d += 7.3;
        }
    }

    #[test]
    fn labels_follow_rounding() {
        assert_eq!(direction_to_text(10.0), "right");
        assert_eq!(direction_to_text(100.0), "up");
        assert_eq!(direction_to_text(200.0), "left");
        assert_eq!(direction_to_text(-80.0), "down");
    }

    #[test]
    fn opposite_is_half_turn() {
        for c in Cardinal::all() {
            let flipped = (c.degrees() + 180.0) % 360.0;
            assert_eq!(c.opposite().degrees(), flipped);
            assert_eq!(c.opposite().opposite(), *c);
        }
    }
}
