use campus_map_shared::models::Room;
use campus_map_shared::space;
use dioxus::prelude::*;

#[component]
pub fn RoomDetails(
    room: Room,
    is_admin: bool,
    on_edit: EventHandler<()>,
    on_delete: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    let position = space::format_point(room.position());
    let route_info = match room.route() {
        Some(r) => {
            let count = r.len();
            let length = space::path_length(r);
            rsx! {
                p { class: "route-info", "Route: {count} points, {length:.1} map units" }
            }
        }
        None => rsx! {
            p { class: "route-info muted", "No route recorded" }
        },
    };

    rsx! {
        div { class: "panel room-details",
            div { class: "panel-title",
                h3 { "{room.name}" }
                button {
                    class: "icon",
                    "aria-label": "Close details",
                    onclick: move |_| on_close.call(()),
                    "×"
                }
            }
            dl {
                dt { "Type" }
                dd { "{room.room_type}" }
                dt { "Building" }
                dd { "{room.building}" }
                dt { "Floor" }
                dd { "{room.floor}" }
                dt { "Capacity" }
                dd { "{room.capacity}" }
                dt { "Position" }
                dd { "{position}" }
            }
            if !room.description.is_empty() {
                p { class: "description", "{room.description}" }
            }
            if !room.amenities.is_empty() {
                ul { class: "amenities",
                    for a in room.amenities.iter() {
                        li { key: "{a}", "{a}" }
                    }
                }
            }
            {route_info}
            if is_admin {
                div { class: "button-row",
                    button { onclick: move |_| on_edit.call(()), "Edit" }
                    button {
                        class: "danger",
                        onclick: move |_| on_delete.call(()),
                        "Delete"
                    }
                }
            }
        }
    }
}
