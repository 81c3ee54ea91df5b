//! Everything that happens between a pointer event on the map and a change in
//! application state: viewport gestures, path tracing and position picking.
//!
//! The frontend only translates DOM events into calls here and reacts to the
//! returned [`MapAction`].

use crate::coords::{self, ScreenPoint, ScreenRect};
use crate::models::{Point, Room, RoomId};
use crate::path::{FinishedPath, PathError, PathIssue, PathTracer, TracerConfig};
use crate::space::{self, MAP_CENTER};
use crate::viewport::{
    PointerButton, PointerConfig, PointerGesture, PointerPhase, PointerRelease, Viewport, ViewportLimits,
    ZoomDirection,
};

/// Marker hit radius in map units at zoom 1. Markers are drawn at constant
/// screen size, so the radius shrinks as the zoom grows.
pub const MARKER_HIT_RADIUS: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Clicks select markers; primary drag pans.
    #[default]
    Browse,
    /// Clicks append route points; pan with Shift, right or middle button.
    Tracing,
    /// The next click sets the edited room's position.
    Placing,
}

impl InteractionMode {
    pub fn label(&self) -> &'static str {
        match self {
            InteractionMode::Browse => "Browse",
            InteractionMode::Tracing => "Tracing path",
            InteractionMode::Placing => "Placing room",
        }
    }
}

/// Result of a completed pointer gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum MapAction {
    None,
    SelectRoom(RoomId),
    ClearSelection,
    PathPointAdded {
        point: Point,
        warnings: Vec<PathIssue>,
    },
    PositionPicked(Point),
}

/// Nearest room whose marker lies within `radius` of `p`.
pub fn hit_test(rooms: &[Room], p: Point, radius: f64) -> Option<&Room> {
    let mut best: Option<&Room> = None;
    let mut best_dist = radius;
    for room in rooms {
        let d = space::distance(room.position(), p);
        if d < best_dist {
            best_dist = d;
            best = Some(room);
        }
    }
    best
}

#[derive(Debug, Clone, Default)]
pub struct MapInteraction {
    viewport: Viewport,
    limits: ViewportLimits,
    gesture: PointerGesture,
    tracer: PathTracer,
    mode: InteractionMode,
}

impl MapInteraction {
    pub fn new(limits: ViewportLimits, pointer: PointerConfig, tracer: TracerConfig) -> Self {
        MapInteraction {
            viewport: Viewport::default(),
            limits,
            gesture: PointerGesture::new(pointer),
            tracer: PathTracer::new(tracer),
            mode: InteractionMode::Browse,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn limits(&self) -> &ViewportLimits {
        &self.limits
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn tracer(&self) -> &PathTracer {
        &self.tracer
    }

    pub fn traced_points(&self) -> &[Point] {
        self.tracer.points()
    }

    pub fn is_panning(&self) -> bool {
        self.gesture.is_panning()
    }

    /// A press is being tracked (pressed or dragging).
    pub fn is_pointer_down(&self) -> bool {
        self.gesture.phase() != PointerPhase::Idle
    }

    pub fn start_tracing(&mut self) {
        self.gesture.cancel();
        self.tracer.start();
        self.mode = InteractionMode::Tracing;
    }

    /// Continue editing an existing route.
    pub fn resume_tracing(&mut self, points: &[Point]) {
        self.gesture.cancel();
        self.tracer.start_from(points);
        self.mode = InteractionMode::Tracing;
    }

    pub fn start_placing(&mut self) {
        self.gesture.cancel();
        if self.tracer.is_active() {
            self.tracer.cancel();
        }
        self.mode = InteractionMode::Placing;
        tracing::debug!("placing mode");
    }

    /// Leave tracing or placing, discarding any unfinished route.
    pub fn cancel_mode(&mut self) {
        if self.tracer.is_active() {
            self.tracer.cancel();
        }
        self.gesture.cancel();
        self.mode = InteractionMode::Browse;
    }

    pub fn remove_last_point(&mut self) -> Option<Point> {
        if self.mode != InteractionMode::Tracing {
            return None;
        }
        self.tracer.remove_last()
    }

    /// Finish the route. Returns to browsing only on success.
    pub fn finish_path(&mut self) -> Result<FinishedPath, PathError> {
        let path = self.tracer.finish()?;
        self.mode = InteractionMode::Browse;
        Ok(path)
    }

    pub fn pointer_down(&mut self, at: ScreenPoint, button: PointerButton, shift: bool) {
        let plain_pan = self.mode == InteractionMode::Browse;
        self.gesture.press(at, button, shift, plain_pan, &self.viewport);
    }

    /// Returns whether the viewport moved.
    pub fn pointer_move(&mut self, at: ScreenPoint, rect: &ScreenRect) -> bool {
        self.gesture
            .motion(at, rect, &mut self.viewport, &self.limits)
    }

    pub fn pointer_up(&mut self, at: ScreenPoint, rect: &ScreenRect, rooms: &[Room]) -> MapAction {
        let origin = match self.gesture.release(at) {
            PointerRelease::Click(origin) => origin,
            PointerRelease::DragEnd | PointerRelease::Ignored => return MapAction::None,
        };
        let Some(p) = coords::screen_to_map(origin, rect, &self.viewport) else {
            tracing::warn!("click on a map without layout ignored");
            return MapAction::None;
        };

        match self.mode {
            InteractionMode::Browse => {
                let radius = MARKER_HIT_RADIUS / self.viewport.zoom;
                match hit_test(rooms, p, radius) {
                    Some(room) => MapAction::SelectRoom(room.id.clone()),
                    None => MapAction::ClearSelection,
                }
            }
            InteractionMode::Tracing => match self.tracer.add_point(p) {
                Ok(warnings) => MapAction::PathPointAdded { point: p, warnings },
                Err(e) => {
                    tracing::warn!(error = %e, "point not added");
                    MapAction::None
                }
            },
            InteractionMode::Placing => {
                self.mode = InteractionMode::Browse;
                tracing::debug!(x = p.x, y = p.y, "position picked");
                MapAction::PositionPicked(p)
            }
        }
    }

    /// Pointer left the map: drop the gesture without a click.
    pub fn pointer_leave(&mut self) {
        self.gesture.cancel();
    }

    /// Wheel zoom anchored at the cursor. Returns whether the viewport changed.
    pub fn wheel(&mut self, delta_y: f64, at: ScreenPoint, rect: &ScreenRect) -> bool {
        let Some(direction) = ZoomDirection::from_wheel(delta_y) else {
            return false;
        };
        let anchor = coords::screen_to_local(at, rect);
        self.viewport.step_zoom(direction, anchor, &self.limits)
    }

    /// Button zoom, anchored at the centre of the view.
    pub fn zoom_in(&mut self) -> bool {
        self.viewport
            .step_zoom(ZoomDirection::In, Some(MAP_CENTER), &self.limits)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.viewport
            .step_zoom(ZoomDirection::Out, Some(MAP_CENTER), &self.limits)
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoomDraft, RoomType};

    const RECT: ScreenRect = ScreenRect::new(0.0, 0.0, 1000.0, 1000.0);

    fn sp(x: f64, y: f64) -> ScreenPoint {
        ScreenPoint::new(x, y)
    }

    fn click(m: &mut MapInteraction, at: ScreenPoint, rooms: &[Room]) -> MapAction {
        m.pointer_down(at, PointerButton::Primary, false);
        m.pointer_up(at, &RECT, rooms)
    }

    fn room(id: &str, x: f64, y: f64) -> Room {
        Room {
            id: id.into(),
            name: format!("Room {id}"),
            x,
            y,
            description: String::new(),
            capacity: 20,
            room_type: RoomType::Classroom,
            floor: "0".into(),
            building: "A".into(),
            amenities: Default::default(),
            path: None,
        }
    }

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_traced_clicks_become_room_route() {
        let mut m = MapInteraction::default();
        m.start_tracing();
        for at in [sp(500.0, 500.0), sp(600.0, 600.0), sp(700.0, 400.0)] {
            assert!(matches!(
                click(&mut m, at, &[]),
                MapAction::PathPointAdded { .. }
            ));
        }
        let path = m.finish_path().unwrap();
        assert_eq!(m.mode(), InteractionMode::Browse);
        assert_eq!(
            path.points(),
            &[
                Point::new(50.0, 50.0),
                Point::new(60.0, 60.0),
                Point::new(70.0, 40.0)
            ]
        );

        let mut draft = RoomDraft::default();
        draft.apply_path(path);
        assert_eq!(draft.x, 70.0);
        assert_eq!(draft.y, 40.0);
        assert_eq!(draft.path.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_pan_shifts_later_clicks() {
        let mut m = MapInteraction::default();
        m.start_tracing();
        // right-drag 40 px to the right: content moves 4 units right
        m.pointer_down(sp(500.0, 500.0), PointerButton::Secondary, false);
        assert!(m.pointer_move(sp(540.0, 500.0), &RECT));
        assert_eq!(m.pointer_up(sp(540.0, 500.0), &RECT, &[]), MapAction::None);
        assert!(m.traced_points().is_empty());

        match click(&mut m, sp(500.0, 500.0), &[]) {
            MapAction::PathPointAdded { point, .. } => assert_close(point, Point::new(46.0, 50.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_primary_drag_in_tracing_neither_pans_nor_adds() {
        let mut m = MapInteraction::default();
        m.start_tracing();
        m.pointer_down(sp(100.0, 100.0), PointerButton::Primary, false);
        assert!(!m.pointer_move(sp(300.0, 100.0), &RECT));
        assert_eq!(m.pointer_up(sp(300.0, 100.0), &RECT, &[]), MapAction::None);
        assert_eq!(*m.viewport(), Viewport::default());
        assert!(m.traced_points().is_empty());
    }

    #[test]
    fn test_shift_drag_pans_while_tracing() {
        let mut m = MapInteraction::default();
        m.start_tracing();
        m.pointer_down(sp(100.0, 100.0), PointerButton::Primary, true);
        assert!(m.pointer_move(sp(100.0, 200.0), &RECT));
        assert!((m.viewport().pan.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_browse_click_selects_nearest_marker() {
        let rooms = vec![room("a", 50.0, 50.0), room("b", 52.0, 50.0)];
        let mut m = MapInteraction::default();
        assert_eq!(
            click(&mut m, sp(515.0, 500.0), &rooms),
            MapAction::SelectRoom("b".into())
        );
        assert_eq!(
            click(&mut m, sp(100.0, 100.0), &rooms),
            MapAction::ClearSelection
        );
    }

    #[test]
    fn test_hit_radius_shrinks_with_zoom() {
        let rooms = vec![room("a", 50.0, 50.0)];
        let mut m = MapInteraction::default();
        // 2 units away hits at zoom 1
        assert_eq!(
            click(&mut m, sp(520.0, 500.0), &rooms),
            MapAction::SelectRoom("a".into())
        );
        while m.zoom_in() {}
        // 2 units away no longer hits at max zoom
        let target = coords::map_to_screen(Point::new(52.0, 50.0), &RECT, m.viewport());
        assert_eq!(click(&mut m, target, &rooms), MapAction::ClearSelection);
    }

    #[test]
    fn test_browse_drag_pans_and_selects_nothing() {
        let rooms = vec![room("a", 50.0, 50.0)];
        let mut m = MapInteraction::default();
        m.pointer_down(sp(500.0, 500.0), PointerButton::Primary, false);
        assert!(m.pointer_move(sp(500.0, 600.0), &RECT));
        assert!(m.is_panning());
        assert_eq!(m.pointer_up(sp(500.0, 600.0), &RECT, &rooms), MapAction::None);
    }

    #[test]
    fn test_placing_picks_once_and_returns_to_browse() {
        let mut m = MapInteraction::default();
        m.start_placing();
        assert_eq!(
            click(&mut m, sp(250.0, 750.0), &[]),
            MapAction::PositionPicked(Point::new(25.0, 75.0))
        );
        assert_eq!(m.mode(), InteractionMode::Browse);
    }

    #[test]
    fn test_finish_failure_keeps_tracing() {
        let mut m = MapInteraction::default();
        m.start_tracing();
        click(&mut m, sp(500.0, 500.0), &[]);
        assert!(matches!(m.finish_path(), Err(PathError::TooFewPoints(1))));
        assert_eq!(m.mode(), InteractionMode::Tracing);
        assert_eq!(m.traced_points().len(), 1);
    }

    #[test]
    fn test_cancel_mode_discards_route() {
        let mut m = MapInteraction::default();
        m.start_tracing();
        click(&mut m, sp(500.0, 500.0), &[]);
        m.cancel_mode();
        assert_eq!(m.mode(), InteractionMode::Browse);
        assert!(m.traced_points().is_empty());
        assert!(!m.tracer().is_active());
    }

    #[test]
    fn test_remove_last_point_only_while_tracing() {
        let mut m = MapInteraction::default();
        assert_eq!(m.remove_last_point(), None);
        m.resume_tracing(&[Point::new(1.0, 1.0), Point::new(9.0, 9.0)]);
        assert_eq!(m.remove_last_point(), Some(Point::new(9.0, 9.0)));
        assert_eq!(m.traced_points(), &[Point::new(1.0, 1.0)]);
    }

    #[test]
    fn test_wheel_zoom_keeps_cursor_point() {
        let mut m = MapInteraction::default();
        let at = sp(200.0, 700.0);
        let before = coords::screen_to_map(at, &RECT, m.viewport()).unwrap();
        assert!(m.wheel(-100.0, at, &RECT));
        assert!(m.viewport().zoom > 1.0);
        let after = coords::screen_to_map(at, &RECT, m.viewport()).unwrap();
        assert_close(before, after);
        assert!(!m.wheel(0.0, at, &RECT));
    }

    #[test]
    fn test_button_zoom_keeps_centre() {
        let mut m = MapInteraction::default();
        m.zoom_in();
        m.zoom_in();
        let centre = coords::screen_to_map(sp(500.0, 500.0), &RECT, m.viewport()).unwrap();
        assert_close(centre, MAP_CENTER);
        m.reset_view();
        assert_eq!(*m.viewport(), Viewport::default());
    }

    #[test]
    fn test_pointer_leave_drops_click() {
        let mut m = MapInteraction::default();
        m.start_tracing();
        m.pointer_down(sp(500.0, 500.0), PointerButton::Primary, false);
        assert!(m.is_pointer_down());
        m.pointer_leave();
        assert!(!m.is_pointer_down());
        assert_eq!(m.pointer_up(sp(500.0, 500.0), &RECT, &[]), MapAction::None);
        assert!(m.traced_points().is_empty());
    }
}
