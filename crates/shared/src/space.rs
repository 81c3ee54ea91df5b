/// Campus map coordinate space.
///
/// Every position on the map is stored in a fixed normalized space of
/// 100 x 100 units, independent of the background image's pixel size.
/// The image is stretched to fill that square when rendered, so both axes
/// share the same bound.
use crate::models::Point;

/// Upper bound of both axes in map space.
pub const MAP_MAX: f64 = 100.0;

/// Centre of the map in map space.
pub const MAP_CENTER: Point = Point {
    x: MAP_MAX / 2.0,
    y: MAP_MAX / 2.0,
};

/// Clamp a single coordinate into `[0, MAP_MAX]`. NaN collapses to 0.
pub fn clamp_axis(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, MAP_MAX)
}

/// True when `v` is a finite value inside `[0, MAP_MAX]`.
pub fn axis_in_bounds(v: f64) -> bool {
    v.is_finite() && (0.0..=MAP_MAX).contains(&v)
}

/// Euclidean distance between two map points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Total length of a polyline in map units.
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Format a map point for display, e.g. `"(42.5, 17.0)"`.
pub fn format_point(p: Point) -> String {
    format!("({:.1}, {:.1})", p.x, p.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_axis_inside() {
        assert!((clamp_axis(42.0) - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_axis_outside() {
        assert_eq!(clamp_axis(-3.0), 0.0);
        assert_eq!(clamp_axis(140.0), MAP_MAX);
        assert_eq!(clamp_axis(f64::INFINITY), MAP_MAX);
        assert_eq!(clamp_axis(f64::NAN), 0.0);
    }

    #[test]
    fn test_axis_in_bounds_edges() {
        assert!(axis_in_bounds(0.0));
        assert!(axis_in_bounds(MAP_MAX));
        assert!(!axis_in_bounds(-0.001));
        assert!(!axis_in_bounds(MAP_MAX + 0.001));
        assert!(!axis_in_bounds(f64::NAN));
    }

    #[test]
    fn test_distance_diagonal() {
        let a = Point { x: 0.0, y: 0.0 };
        let b = Point { x: 3.0, y: 4.0 };
        assert!((distance(a, b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_path_length() {
        let pts = [
            Point { x: 0.0, y: 0.0 },
            Point { x: 3.0, y: 4.0 },
            Point { x: 3.0, y: 14.0 },
        ];
        assert!((path_length(&pts) - 15.0).abs() < 1e-9);
        assert_eq!(path_length(&pts[..1]), 0.0);
        assert_eq!(path_length(&[]), 0.0);
    }

    #[test]
    fn test_format_point() {
        assert_eq!(format_point(Point { x: 42.46, y: 17.0 }), "(42.5, 17.0)");
    }
}
