use crate::coords::{self, ScreenPoint, ScreenRect};
use crate::models::Point;
use crate::space::MAP_MAX;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 5.0;
pub const ZOOM_STEP: f64 = 1.1;

/// Pointer travel (screen px) below which a press-release counts as a click.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// Current zoom factor and pan offset. `pan` is in map units; see [`crate::coords`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            zoom: 1.0,
            pan: Point::new(0.0, 0.0),
        }
    }
}

impl Viewport {
    pub fn reset(&mut self) {
        *self = Viewport::default();
    }

    /// SVG `transform` attribute for the content group.
    pub fn svg_transform(&self) -> String {
        format!(
            "scale({}) translate({} {})",
            self.zoom, self.pan.x, self.pan.y
        )
    }

    /// Multiply the zoom by `factor`, keeping the map point under `anchor`
    /// (SVG local space) fixed. With no anchor the local origin stays fixed.
    /// Returns whether anything changed.
    pub fn zoom_by(&mut self, factor: f64, anchor: Option<Point>, limits: &ViewportLimits) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let old_zoom = self.zoom;
        let new_zoom = limits.clamp_zoom(old_zoom * factor);
        if (new_zoom - old_zoom).abs() < 1e-12 {
            return false;
        }

        let anchor = anchor.unwrap_or_default();
        let content = coords::local_to_map(anchor, self);
        let pan = Point::new(
            anchor.x / new_zoom - content.x,
            anchor.y / new_zoom - content.y,
        );
        self.zoom = new_zoom;
        self.pan = limits.clamp_pan(pan, new_zoom);
        true
    }

    /// One discrete zoom step in `direction`.
    pub fn step_zoom(&mut self, direction: ZoomDirection, anchor: Option<Point>, limits: &ViewportLimits) -> bool {
        let factor = match direction {
            ZoomDirection::In => limits.zoom_step,
            ZoomDirection::Out => 1.0 / limits.zoom_step,
        };
        self.zoom_by(factor, anchor, limits)
    }

    pub fn set_pan(&mut self, pan: Point, limits: &ViewportLimits) {
        self.pan = limits.clamp_pan(pan, self.zoom);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Wheel convention: scrolling up (negative delta) zooms in.
    pub fn from_wheel(delta_y: f64) -> Option<Self> {
        if delta_y < 0.0 {
            Some(ZoomDirection::In)
        } else if delta_y > 0.0 {
            Some(ZoomDirection::Out)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanPolicy {
    /// Pan anywhere.
    #[default]
    Free,
    /// Zoomed in: the map always covers the view. Zoomed out: the map stays inside it.
    Contain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLimits {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub pan_policy: PanPolicy,
}

impl Default for ViewportLimits {
    fn default() -> Self {
        ViewportLimits {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            pan_policy: PanPolicy::Free,
        }
    }
}

impl ViewportLimits {
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return 1.0_f64.clamp(self.min_zoom, self.max_zoom);
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    pub fn clamp_pan(&self, pan: Point, zoom: f64) -> Point {
        match self.pan_policy {
            PanPolicy::Free => pan,
            PanPolicy::Contain => {
                let slack = MAP_MAX / zoom - MAP_MAX;
                let (lo, hi) = (slack.min(0.0), slack.max(0.0));
                Point::new(pan.x.clamp(lo, hi), pan.y.clamp(lo, hi))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerConfig {
    pub drag_threshold_px: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        PointerConfig {
            drag_threshold_px: DRAG_THRESHOLD_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerPhase {
    Idle,
    /// Button down, still within the click threshold.
    Pressed {
        origin: ScreenPoint,
        button: PointerButton,
        start_pan: Point,
        can_pan: bool,
    },
    /// Moved past the threshold; the eventual release is not a click.
    Dragging {
        origin: ScreenPoint,
        button: PointerButton,
        start_pan: Point,
        can_pan: bool,
    },
}

/// What a pointer release amounted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerRelease {
    Click(ScreenPoint),
    DragEnd,
    /// No press was being tracked, or a non-primary press that never moved.
    Ignored,
}

/// Click-vs-drag state machine: `Idle → Pressed → {Dragging | click}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerGesture {
    phase: PointerPhase,
    config: PointerConfig,
}

impl Default for PointerGesture {
    fn default() -> Self {
        PointerGesture::new(PointerConfig::default())
    }
}

impl PointerGesture {
    pub fn new(config: PointerConfig) -> Self {
        PointerGesture {
            phase: PointerPhase::Idle,
            config,
        }
    }

    pub fn phase(&self) -> PointerPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, PointerPhase::Dragging { .. })
    }

    /// Whether the active drag is moving the map.
    pub fn is_panning(&self) -> bool {
        matches!(self.phase, PointerPhase::Dragging { can_pan: true, .. })
    }

    /// Begin tracking a press. `plain_pan` says whether the primary button pans
    /// without a modifier in the current mode; `pan_modifier` is e.g. Shift.
    pub fn press(
        &mut self,
        at: ScreenPoint,
        button: PointerButton,
        pan_modifier: bool,
        plain_pan: bool,
        viewport: &Viewport,
    ) {
        let can_pan = match button {
            PointerButton::Primary => plain_pan || pan_modifier,
            PointerButton::Secondary | PointerButton::Auxiliary => true,
        };
        self.phase = PointerPhase::Pressed {
            origin: at,
            button,
            start_pan: viewport.pan,
            can_pan,
        };
    }

    /// Feed a pointer move. Returns whether the viewport changed.
    pub fn motion(
        &mut self,
        at: ScreenPoint,
        rect: &ScreenRect,
        viewport: &mut Viewport,
        limits: &ViewportLimits,
    ) -> bool {
        let (origin, button, start_pan, can_pan) = match self.phase {
            PointerPhase::Idle => return false,
            PointerPhase::Pressed {
                origin,
                button,
                start_pan,
                can_pan,
            } => {
                if origin.distance(at) <= self.config.drag_threshold_px {
                    return false;
                }
                tracing::trace!(can_pan, "pointer drag started");
                (origin, button, start_pan, can_pan)
            }
            PointerPhase::Dragging {
                origin,
                button,
                start_pan,
                can_pan,
            } => (origin, button, start_pan, can_pan),
        };
        self.phase = PointerPhase::Dragging {
            origin,
            button,
            start_pan,
            can_pan,
        };
        if !can_pan {
            return false;
        }

        let Some(delta) = coords::screen_delta_to_pan(at.x - origin.x, at.y - origin.y, rect, viewport.zoom) else {
            return false;
        };
        viewport.set_pan(
            Point::new(start_pan.x + delta.x, start_pan.y + delta.y),
            limits,
        );
        true
    }

    /// Finish the gesture and report whether it was a click.
    pub fn release(&mut self, at: ScreenPoint) -> PointerRelease {
        let phase = std::mem::replace(&mut self.phase, PointerPhase::Idle);
        match phase {
            PointerPhase::Idle => PointerRelease::Ignored,
            PointerPhase::Pressed {
                origin,
                button: PointerButton::Primary,
                ..
            } => {
                // A release past the threshold without intermediate moves is still a drag.
                if origin.distance(at) > self.config.drag_threshold_px {
                    PointerRelease::DragEnd
                } else {
                    PointerRelease::Click(origin)
                }
            }
            PointerPhase::Pressed { .. } => PointerRelease::Ignored,
            PointerPhase::Dragging { .. } => PointerRelease::DragEnd,
        }
    }

    /// Abort without producing a click (pointer left the map, touch cancelled).
    pub fn cancel(&mut self) {
        self.phase = PointerPhase::Idle;
    }
}
