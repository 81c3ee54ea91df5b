//! Screen ↔ map coordinate conversion.
//!
//! The map is drawn into an SVG whose local space is `0..MAP_MAX` on both axes,
//! stretched over the on-screen rect. Content inside it is transformed with
//! `scale(zoom) translate(pan)`, i.e.
//!
//! ```text
//! local = zoom * (map + pan)
//! map   = local / zoom - pan
//! ```
//!
//! Rendering and hit-testing must both go through this module so they never
//! disagree about where a point is.

use crate::models::Point;
use crate::space::{self, MAP_MAX};
use crate::viewport::Viewport;

/// A position in browser client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        ScreenPoint { x, y }
    }

    pub fn distance(self, other: ScreenPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Bounding client rect of the map element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        ScreenRect {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Map-space units per screen pixel on each axis.
    pub fn units_per_px(&self) -> Option<(f64, f64)> {
        if self.is_degenerate() {
            return None;
        }
        Some((MAP_MAX / self.width, MAP_MAX / self.height))
    }
}

/// Screen point → unzoomed SVG local space (`0..MAP_MAX` across the rect).
pub fn screen_to_local(screen: ScreenPoint, rect: &ScreenRect) -> Option<Point> {
    let (ux, uy) = rect.units_per_px()?;
    Some(Point::new(
        (screen.x - rect.left) * ux,
        (screen.y - rect.top) * uy,
    ))
}

/// SVG local space → screen point.
pub fn local_to_screen(local: Point, rect: &ScreenRect) -> ScreenPoint {
    ScreenPoint::new(
        rect.left + local.x / MAP_MAX * rect.width,
        rect.top + local.y / MAP_MAX * rect.height,
    )
}

/// Map point → SVG local space under the viewport transform.
pub fn map_to_local(p: Point, viewport: &Viewport) -> Point {
    Point::new(
        viewport.zoom * (p.x + viewport.pan.x),
        viewport.zoom * (p.y + viewport.pan.y),
    )
}

/// SVG local space → map point, not clamped.
pub fn local_to_map(local: Point, viewport: &Viewport) -> Point {
    Point::new(
        local.x / viewport.zoom - viewport.pan.x,
        local.y / viewport.zoom - viewport.pan.y,
    )
}

/// Convert a pointer position into map space, clamped to the map bounds.
///
/// Returns `None` when the rect has no area or the zoom is not positive.
pub fn screen_to_map(screen: ScreenPoint, rect: &ScreenRect, viewport: &Viewport) -> Option<Point> {
    if viewport.zoom <= 0.0 || !viewport.zoom.is_finite() {
        return None;
    }
    let local = screen_to_local(screen, rect)?;
    let raw = local_to_map(local, viewport);
    Some(Point::clamped(raw.x, raw.y))
}

/// Where a map point lands on screen. Exact inverse of [`screen_to_map`]
/// for in-bounds points.
pub fn map_to_screen(p: Point, rect: &ScreenRect, viewport: &Viewport) -> ScreenPoint {
    local_to_screen(map_to_local(p, viewport), rect)
}

/// Convert a pixel drag delta into the pan change that keeps content glued to
/// the pointer at the given zoom.
pub fn screen_delta_to_pan(dx: f64, dy: f64, rect: &ScreenRect, zoom: f64) -> Option<Point> {
    let (ux, uy) = rect.units_per_px()?;
    if zoom <= 0.0 {
        return None;
    }
    Some(Point::new(dx * ux / zoom, dy * uy / zoom))
}

/// Visible portion of the map in map space, as `(top_left, bottom_right)`, clamped.
pub fn visible_map_bounds(viewport: &Viewport) -> (Point, Point) {
    let tl = local_to_map(Point::new(0.0, 0.0), viewport);
    let br = local_to_map(Point::new(MAP_MAX, MAP_MAX), viewport);
    (
        Point::new(space::clamp_axis(tl.x), space::clamp_axis(tl.y)),
        Point::new(space::clamp_axis(br.x), space::clamp_axis(br.y)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: ScreenRect = ScreenRect::new(100.0, 50.0, 800.0, 600.0);

    fn vp(zoom: f64, pan_x: f64, pan_y: f64) -> Viewport {
        Viewport {
            zoom,
            pan: Point::new(pan_x, pan_y),
        }
    }

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_identity_viewport_maps_rect_corners() {
        let v = Viewport::default();
        let tl = screen_to_map(ScreenPoint::new(100.0, 50.0), &RECT, &v).unwrap();
        let br = screen_to_map(ScreenPoint::new(900.0, 650.0), &RECT, &v).unwrap();
        assert_close(tl, Point::new(0.0, 0.0));
        assert_close(br, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_centre_click_at_identity() {
        let p = screen_to_map(ScreenPoint::new(500.0, 350.0), &RECT, &Viewport::default()).unwrap();
        assert_close(p, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_zoom_two_halves_coordinates() {
        let p = screen_to_map(ScreenPoint::new(500.0, 350.0), &RECT, &vp(2.0, 0.0, 0.0)).unwrap();
        assert_close(p, Point::new(25.0, 25.0));
    }

    #[test]
    fn test_pan_shifts_coordinates() {
        // pan of -10 map units moves content left/up, so the centre shows (60, 60)
        let p = screen_to_map(ScreenPoint::new(500.0, 350.0), &RECT, &vp(1.0, -10.0, -10.0)).unwrap();
        assert_close(p, Point::new(60.0, 60.0));
    }

    #[test]
    fn test_clamps_outside_clicks() {
        let v = vp(0.5, 0.0, 0.0);
        for s in [
            ScreenPoint::new(-1000.0, -1000.0),
            ScreenPoint::new(5000.0, 5000.0),
            ScreenPoint::new(900.0, 650.0),
            ScreenPoint::new(100.0, 9000.0),
        ] {
            let p = screen_to_map(s, &RECT, &v).unwrap();
            assert!((0.0..=MAP_MAX).contains(&p.x), "{p:?}");
            assert!((0.0..=MAP_MAX).contains(&p.y), "{p:?}");
        }
    }

    #[test]
    fn test_clamping_holds_across_viewports() {
        for zoom in [0.5, 1.0, 1.7, 3.0, 5.0] {
            for pan in [-80.0, -10.0, 0.0, 25.0, 90.0] {
                let v = vp(zoom, pan, -pan);
                for sx in [-200.0, 100.0, 333.0, 900.0, 1500.0] {
                    for sy in [-50.0, 50.0, 400.0, 650.0, 999.0] {
                        let p = screen_to_map(ScreenPoint::new(sx, sy), &RECT, &v).unwrap();
                        assert!(p.in_bounds(), "{p:?} for zoom {zoom} pan {pan}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_round_trip_inside_bounds() {
        let points = [
            Point::new(0.5, 0.5),
            Point::new(50.0, 50.0),
            Point::new(12.3, 87.6),
            Point::new(99.0, 1.0),
        ];
        for zoom in [0.5, 1.0, 2.5, 5.0] {
            for (px, py) in [(0.0, 0.0), (-30.0, 12.0), (7.5, -44.0)] {
                let v = vp(zoom, px, py);
                for p in points {
                    let s = map_to_screen(p, &RECT, &v);
                    let back = screen_to_map(s, &RECT, &v).unwrap();
                    assert!((back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_degenerate_rect_yields_none() {
        let rect = ScreenRect::new(0.0, 0.0, 0.0, 600.0);
        assert!(screen_to_map(ScreenPoint::new(1.0, 1.0), &rect, &Viewport::default()).is_none());
        assert!(screen_delta_to_pan(1.0, 1.0, &rect, 1.0).is_none());
    }

    #[test]
    fn test_non_positive_zoom_yields_none() {
        assert!(screen_to_map(ScreenPoint::new(500.0, 350.0), &RECT, &vp(0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_non_square_rect_scales_axes_independently() {
        // 800 px wide, 600 px tall: 8 px per unit on x, 6 px per unit on y
        let p = screen_to_map(ScreenPoint::new(180.0, 110.0), &RECT, &Viewport::default()).unwrap();
        assert_close(p, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_screen_delta_to_pan_accounts_for_zoom() {
        let d = screen_delta_to_pan(80.0, 60.0, &RECT, 2.0).unwrap();
        assert_close(d, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_visible_bounds_at_zoom() {
        let (tl, br) = visible_map_bounds(&vp(2.0, -25.0, -25.0));
        assert_close(tl, Point::new(25.0, 25.0));
        assert_close(br, Point::new(75.0, 75.0));
    }
}
