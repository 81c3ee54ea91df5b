use campus_map_shared::filter::{self, RoomFilter};
use campus_map_shared::models::{Room, RoomId, RoomType};
use dioxus::prelude::*;

#[component]
pub fn RoomList(
    rooms: Vec<Room>,
    filter: Signal<RoomFilter>,
    selected: Signal<Option<RoomId>>,
) -> Element {
    let buildings = filter::buildings(&rooms);
    let floors = filter::floors(&rooms);
    let current = filter.read().clone();
    let hits = current.apply(&rooms);
    let hit_count = hits.len();
    let total = rooms.len();
    let type_value = current.room_type.map(|t| t.as_str()).unwrap_or("");
    let building_value = current.building.clone().unwrap_or_default();
    let floor_value = current.floor.clone().unwrap_or_default();

    rsx! {
        div { class: "panel room-list",
            h3 { "Rooms" }
            input {
                r#type: "search",
                placeholder: "Search rooms...",
                "aria-label": "Search rooms",
                value: "{current.query}",
                oninput: move |evt: Event<FormData>| {
                    filter.write().query = evt.value();
                },
            }
            div { class: "filter-row",
                select {
                    "aria-label": "Room type",
                    value: "{type_value}",
                    onchange: move |evt: Event<FormData>| {
                        filter.write().room_type = evt.value().parse::<RoomType>().ok();
                    },
                    option { value: "", "All types" }
                    for t in RoomType::ALL {
                        option {
                            value: t.as_str(),
                            selected: current.room_type == Some(t),
                            {t.label()}
                        }
                    }
                }
                select {
                    "aria-label": "Building",
                    value: "{building_value}",
                    onchange: move |evt: Event<FormData>| {
                        let v = evt.value();
                        filter.write().building = (!v.is_empty()).then_some(v);
                    },
                    option { value: "", "All buildings" }
                    for b in buildings {
                        option {
                            selected: current.building.as_deref() == Some(b.as_str()),
                            value: "{b}",
                            "{b}"
                        }
                    }
                }
                select {
                    "aria-label": "Floor",
                    value: "{floor_value}",
                    onchange: move |evt: Event<FormData>| {
                        let v = evt.value();
                        filter.write().floor = (!v.is_empty()).then_some(v);
                    },
                    option { value: "", "All floors" }
                    for f in floors {
                        option {
                            selected: current.floor.as_deref() == Some(f.as_str()),
                            value: "{f}",
                            "Floor {f}"
                        }
                    }
                }
            }
            if current.is_active() {
                div { class: "filter-summary",
                    span { "{hit_count} of {total} rooms" }
                    button {
                        class: "secondary",
                        onclick: move |_| filter.set(RoomFilter::default()),
                        "Clear"
                    }
                }
            }
            ul {
                for room in hits {
                    li {
                        key: "{room.id}",
                        class: if selected.read().as_deref() == Some(room.id.as_str()) { "selected" } else { "" },
                        onclick: {
                            let id = room.id.clone();
                            move |_| selected.set(Some(id.clone()))
                        },
                        span { class: "room-name", "{room.name}" }
                        span { class: "room-meta", "{room.building} · {room.room_type}" }
                    }
                }
                if hit_count == 0 {
                    li { class: "empty", "No rooms match" }
                }
            }
        }
    }
}
