use campus_map_shared::coords::{ScreenPoint, ScreenRect};
use campus_map_shared::interaction::{InteractionMode, MapAction, MapInteraction};
use campus_map_shared::models::{Point, Room, RoomId};
use campus_map_shared::space::MAP_MAX;
use campus_map_shared::viewport::{PointerButton, Viewport};
use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;

const MAP_CONTAINER_ID: &str = "campus-map-container";

// Marker geometry in map units at zoom 1; divided by zoom when drawn.
const MARKER_RADIUS: f64 = 1.2;
const SELECTED_RADIUS: f64 = 1.7;
const LABEL_SIZE: f64 = 2.0;
const POINT_RADIUS: f64 = 0.8;
const STROKE_PX: f64 = 2.0;

const ROUTE_COLOR: &str = "#2f7de1";
const TRACE_COLOR: &str = "#f29b1d";
const MARKER_COLOR: &str = "#c43030";
const SELECTED_COLOR: &str = "#5ab882";
const PENDING_COLOR: &str = "#f2d21d";

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

/// Bounding client rect of the map container element.
fn container_rect() -> Option<ScreenRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(MAP_CONTAINER_ID)?;
    let r = element.get_bounding_client_rect();
    Some(ScreenRect::new(r.left(), r.top(), r.width(), r.height()))
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

fn pointer_button(button: Option<MouseButton>) -> Option<PointerButton> {
    match button? {
        MouseButton::Primary => Some(PointerButton::Primary),
        MouseButton::Secondary => Some(PointerButton::Secondary),
        MouseButton::Auxiliary => Some(PointerButton::Auxiliary),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// SVG scene
// ---------------------------------------------------------------------------

/// Everything the renderer draws, back to front.
#[derive(Debug, Clone, Copy)]
pub struct MapScene<'a> {
    pub image_url: &'a str,
    pub viewport: Viewport,
    pub rooms: &'a [Room],
    pub selected: Option<&'a str>,
    pub route: Option<&'a [Point]>,
    pub traced: &'a [Point],
    /// Position of the room being edited, when it is not yet on the map.
    pub pending: Option<Point>,
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn build_svg(scene: &MapScene) -> String {
    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {MAP_MAX} {MAP_MAX}" preserveAspectRatio="none" style="position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;">"#
    ));
    svg.push_str(&format!(
        r#"<g transform="{}">"#,
        scene.viewport.svg_transform()
    ));

    // Keeps markers a constant on-screen size.
    let s = 1.0 / scene.viewport.zoom;

    build_background(&mut svg, scene.image_url);
    if let Some(route) = scene.route {
        build_polyline(&mut svg, route, ROUTE_COLOR, "route");
    }
    build_room_markers(&mut svg, scene.rooms, scene.selected, s);
    if let Some(p) = scene.pending {
        build_pending_marker(&mut svg, p, s);
    }
    build_traced_path(&mut svg, scene.traced, s);

    svg.push_str("</g></svg>");
    svg
}

fn build_background(svg: &mut String, url: &str) {
    let url = escape_xml(url);
    svg.push_str(&format!(
        r#"<image href="{url}" x="0" y="0" width="{MAP_MAX}" height="{MAP_MAX}" preserveAspectRatio="none"/>"#
    ));
}

fn build_polyline(svg: &mut String, points: &[Point], color: &str, class: &str) {
    if points.len() < 2 {
        return;
    }
    let pts: Vec<String> = points.iter().map(|p| format!("{},{}", p.x, p.y)).collect();
    svg.push_str(&format!(
        r#"<polyline class="{class}" points="{}" fill="none" stroke="{color}" stroke-width="{STROKE_PX}" stroke-linejoin="round" stroke-linecap="round" vector-effect="non-scaling-stroke"/>"#,
        pts.join(" ")
    ));
}

fn build_room_markers(svg: &mut String, rooms: &[Room], selected: Option<&str>, s: f64) {
    let fs = LABEL_SIZE * s;
    for room in rooms {
        let is_selected = selected == Some(room.id.as_str());
        let (r, color) = if is_selected {
            (SELECTED_RADIUS * s, SELECTED_COLOR)
        } else {
            (MARKER_RADIUS * s, MARKER_COLOR)
        };
        let (x, y) = (room.x, room.y);
        let ty = y - r - 0.6 * s;
        let name = escape_xml(&room.name);
        svg.push_str(&format!(
            r#"<g class="room-marker" role="img"><title>{name}</title>"#
        ));
        svg.push_str(&format!(
            r#"<circle cx="{x}" cy="{y}" r="{r}" fill="{color}" stroke="white" stroke-width="{STROKE_PX}" vector-effect="non-scaling-stroke"/>"#
        ));
        svg.push_str(&format!(
            r#"<text x="{x}" y="{ty}" fill="white" font-size="{fs}" font-family="sans-serif" font-weight="700" text-anchor="middle" stroke="rgba(0,0,0,0.7)" stroke-width="3" paint-order="stroke" vector-effect="non-scaling-stroke">{name}</text>"#
        ));
        svg.push_str("</g>");
    }
}

fn build_pending_marker(svg: &mut String, p: Point, s: f64) {
    let r = MARKER_RADIUS * s;
    svg.push_str(&format!(
        r#"<circle class="pending-marker" cx="{}" cy="{}" r="{r}" fill="{PENDING_COLOR}" stroke="black" stroke-width="{STROKE_PX}" stroke-dasharray="3 2" vector-effect="non-scaling-stroke"/>"#,
        p.x, p.y
    ));
}

/// In-progress route: line plus numbered points, the last one highlighted.
fn build_traced_path(svg: &mut String, points: &[Point], s: f64) {
    build_polyline(svg, points, TRACE_COLOR, "traced");
    let r = POINT_RADIUS * s;
    let fs = LABEL_SIZE * 0.8 * s;
    let last = points.len().saturating_sub(1);
    for (i, p) in points.iter().enumerate() {
        let fill = if i == last { SELECTED_COLOR } else { TRACE_COLOR };
        let ty = p.y + fs * 0.35;
        svg.push_str(&format!(
            r#"<g class="trace-point"><circle cx="{}" cy="{}" r="{r}" fill="{fill}" stroke="white" stroke-width="1" vector-effect="non-scaling-stroke"/>"#,
            p.x, p.y
        ));
        svg.push_str(&format!(
            r#"<text x="{}" y="{ty}" fill="black" font-size="{fs}" font-family="sans-serif" font-weight="700" text-anchor="middle">{}</text></g>"#,
            p.x,
            i + 1
        ));
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(
    image_url: String,
    interaction: Signal<MapInteraction>,
    rooms: Vec<Room>,
    selected: Option<RoomId>,
    route: Option<Vec<Point>>,
    pending: Option<Point>,
    on_action: EventHandler<MapAction>,
) -> Element {
    let mut touch_active = use_signal(|| false);

    let (viewport, mode, panning, traced) = {
        let m = interaction.read();
        (
            *m.viewport(),
            m.mode(),
            m.is_panning(),
            m.traced_points().to_vec(),
        )
    };

    let svg_html = build_svg(&MapScene {
        image_url: &image_url,
        viewport,
        rooms: &rooms,
        selected: selected.as_deref(),
        route: route.as_deref(),
        traced: &traced,
        pending,
    });

    let zoom_pct = format!("{:.0}%", viewport.zoom * 100.0);
    let container_class = if panning {
        "map-container dragging"
    } else {
        match mode {
            InteractionMode::Browse => "map-container",
            InteractionMode::Tracing | InteractionMode::Placing => "map-container picking",
        }
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",
            tabindex: "0",

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let Some(rect) = container_rect() else { return };
                let client = evt.data().client_coordinates();
                let delta_y = wheel_delta_y(evt.data().delta());
                interaction.write().wheel(delta_y, ScreenPoint::new(client.x, client.y), &rect);
            },

            onmousedown: move |evt: Event<MouseData>| {
                let Some(button) = pointer_button(evt.trigger_button()) else { return };
                let client = evt.client_coordinates();
                let shift = evt.modifiers().contains(Modifiers::SHIFT);
                interaction
                    .write()
                    .pointer_down(ScreenPoint::new(client.x, client.y), button, shift);
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !interaction.peek().is_pointer_down() {
                    return;
                }
                let Some(rect) = container_rect() else { return };
                let client = evt.client_coordinates();
                interaction
                    .write()
                    .pointer_move(ScreenPoint::new(client.x, client.y), &rect);
            },

            onmouseup: {
                let rooms = rooms.clone();
                move |evt: Event<MouseData>| {
                    let Some(rect) = container_rect() else { return };
                    let client = evt.client_coordinates();
                    let action = interaction
                        .write()
                        .pointer_up(ScreenPoint::new(client.x, client.y), &rect, &rooms);
                    if action != MapAction::None {
                        on_action.call(action);
                    }
                }
            },

            oncontextmenu: move |evt: Event<MouseData>| evt.prevent_default(),

            onmouseleave: move |_| interaction.write().pointer_leave(),

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                if interaction.peek().mode() == InteractionMode::Browse {
                    interaction.write().reset_view();
                }
            },

            // --- Touch: one finger behaves like the primary mouse button ---

            ontouchstart: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();
                if touches.len() == 1 {
                    let c = touches[0].client_coordinates();
                    touch_active.set(true);
                    interaction
                        .write()
                        .pointer_down(ScreenPoint::new(c.x, c.y), PointerButton::Primary, false);
                } else {
                    touch_active.set(false);
                    interaction.write().pointer_leave();
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                if !*touch_active.read() {
                    return;
                }
                let touches = evt.data().touches();
                let Some(t) = touches.first() else { return };
                let Some(rect) = container_rect() else { return };
                let c = t.client_coordinates();
                interaction.write().pointer_move(ScreenPoint::new(c.x, c.y), &rect);
            },

            ontouchend: {
                let rooms = rooms.clone();
                move |evt: Event<TouchData>| {
                    evt.prevent_default();
                    if !*touch_active.read() {
                        return;
                    }
                    touch_active.set(false);
                    let Some(rect) = container_rect() else { return };
                    let changed = evt.data().touches_changed();
                    let Some(t) = changed.first() else {
                        interaction.write().pointer_leave();
                        return;
                    };
                    let c = t.client_coordinates();
                    let action = interaction
                        .write()
                        .pointer_up(ScreenPoint::new(c.x, c.y), &rect, &rooms);
                    if action != MapAction::None {
                        on_action.call(action);
                    }
                }
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                touch_active.set(false);
                interaction.write().pointer_leave();
            },

            div {
                class: "map-scene",
                dangerous_inner_html: "{svg_html}",
            }

            div { class: "zoom-readout", "{zoom_pct}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_map_shared::models::RoomType;

    fn room(id: &str, name: &str, x: f64, y: f64) -> Room {
        Room {
            id: id.into(),
            name: name.into(),
            x,
            y,
            description: String::new(),
            capacity: 10,
            room_type: RoomType::Classroom,
            floor: "0".into(),
            building: "A".into(),
            amenities: Default::default(),
            path: None,
        }
    }

    fn scene<'a>(rooms: &'a [Room], traced: &'a [Point]) -> MapScene<'a> {
        MapScene {
            image_url: "/mapa/mapa.png",
            viewport: Viewport::default(),
            rooms,
            selected: None,
            route: None,
            traced,
            pending: None,
        }
    }

    #[test]
    fn test_layers_are_drawn_back_to_front() {
        let rooms = vec![room("1", "Lab", 40.0, 20.0)];
        let traced = vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)];
        let route = vec![Point::new(0.0, 0.0), Point::new(40.0, 20.0)];
        let mut sc = scene(&rooms, &traced);
        sc.route = Some(&route);
        let svg = build_svg(&sc);

        let image = svg.find("<image").unwrap();
        let route_at = svg.find(r#"class="route""#).unwrap();
        let marker = svg.find("room-marker").unwrap();
        let trace = svg.find(r#"class="traced""#).unwrap();
        assert!(image < route_at && route_at < marker && marker < trace);
    }

    #[test]
    fn test_viewport_transform_is_applied() {
        let mut sc = scene(&[], &[]);
        sc.viewport = Viewport {
            zoom: 2.0,
            pan: Point::new(-10.0, 5.0),
        };
        let svg = build_svg(&sc);
        assert!(svg.contains(r#"<g transform="scale(2) translate(-10 5)">"#));
    }

    #[test]
    fn test_marker_size_shrinks_with_zoom() {
        let rooms = vec![room("1", "Lab", 40.0, 20.0)];
        let mut sc = scene(&rooms, &[]);
        sc.viewport.zoom = 2.0;
        let svg = build_svg(&sc);
        assert!(svg.contains(r#"r="0.6""#), "{svg}");
    }

    #[test]
    fn test_selected_marker_is_highlighted() {
        let rooms = vec![room("1", "A", 10.0, 10.0), room("2", "B", 20.0, 20.0)];
        let mut sc = scene(&rooms, &[]);
        sc.selected = Some("2");
        let svg = build_svg(&sc);
        assert_eq!(svg.matches(SELECTED_COLOR).count(), 1);
        assert_eq!(svg.matches(MARKER_COLOR).count(), 1);
    }

    #[test]
    fn test_traced_points_are_numbered() {
        let traced = vec![
            Point::new(50.0, 50.0),
            Point::new(60.0, 60.0),
            Point::new(70.0, 40.0),
        ];
        let svg = build_svg(&scene(&[], &traced));
        assert_eq!(svg.matches("trace-point").count(), 3);
        assert!(svg.contains(">1</text>"));
        assert!(svg.contains(">3</text>"));
        assert!(svg.contains(r#"points="50,50 60,60 70,40""#));
    }

    #[test]
    fn test_single_point_draws_no_line() {
        let traced = vec![Point::new(50.0, 50.0)];
        let svg = build_svg(&scene(&[], &traced));
        assert!(!svg.contains("<polyline"));
        assert_eq!(svg.matches("trace-point").count(), 1);
    }

    #[test]
    fn test_room_names_are_escaped() {
        let rooms = vec![room("1", "R&D <Lab>", 10.0, 10.0)];
        let svg = build_svg(&scene(&rooms, &[]));
        assert!(svg.contains("R&amp;D &lt;Lab&gt;"));
        assert!(!svg.contains("<Lab>"));
    }

    #[test]
    fn test_pending_marker_drawn_when_present() {
        let mut sc = scene(&[], &[]);
        assert!(!build_svg(&sc).contains("pending-marker"));
        sc.pending = Some(Point::new(5.0, 5.0));
        assert!(build_svg(&sc).contains("pending-marker"));
    }

    #[test]
    fn test_wheel_delta_normalization() {
        assert_eq!(wheel_delta_y(WheelDelta::pixels(0.0, 12.0, 0.0)), 12.0);
        assert_eq!(wheel_delta_y(WheelDelta::lines(0.0, -1.0, 0.0)), -40.0);
        assert_eq!(wheel_delta_y(WheelDelta::pages(0.0, 1.0, 0.0)), 400.0);
    }

    #[test]
    fn test_pointer_button_mapping() {
        assert_eq!(pointer_button(Some(MouseButton::Primary)), Some(PointerButton::Primary));
        assert_eq!(pointer_button(Some(MouseButton::Secondary)), Some(PointerButton::Secondary));
        assert_eq!(pointer_button(None), None);
    }
}
