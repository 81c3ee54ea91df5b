use campus_map_shared::interaction::InteractionMode;
use campus_map_shared::models::{RoomDraft, RoomType};
use campus_map_shared::space;
use dioxus::prelude::*;

/// Create/edit form. Position and route come from the map, not from inputs.
#[component]
pub fn RoomForm(
    draft: Signal<RoomDraft>,
    is_new: bool,
    errors: Vec<String>,
    mode: InteractionMode,
    saving: bool,
    on_trace: EventHandler<()>,
    on_place: EventHandler<()>,
    on_clear_path: EventHandler<()>,
    on_save: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    // Kept as typed so a trailing comma survives while editing.
    let mut amenities = use_signal(|| draft.peek().amenities_text());

    let d = draft.read().clone();
    let position = space::format_point(d.position());
    let path_len = d.path.as_ref().map(Vec::len).unwrap_or(0);
    let busy = mode != InteractionMode::Browse;
    let title = if is_new { "New room" } else { "Edit room" };

    rsx! {
        div { class: "panel room-form",
            h3 { "{title}" }

            label { "Name"
                input {
                    r#type: "text",
                    value: "{d.name}",
                    oninput: move |evt: Event<FormData>| draft.write().name = evt.value(),
                }
            }
            div { class: "form-row",
                label { "Building"
                    input {
                        r#type: "text",
                        value: "{d.building}",
                        oninput: move |evt: Event<FormData>| draft.write().building = evt.value(),
                    }
                }
                label { "Floor"
                    input {
                        r#type: "text",
                        value: "{d.floor}",
                        oninput: move |evt: Event<FormData>| draft.write().floor = evt.value(),
                    }
                }
            }
            div { class: "form-row",
                label { "Type"
                    select {
                        value: d.room_type.as_str(),
                        onchange: move |evt: Event<FormData>| {
                            if let Ok(t) = evt.value().parse::<RoomType>() {
                                draft.write().room_type = t;
                            }
                        },
                        for t in RoomType::ALL {
                            option {
                                value: t.as_str(),
                                selected: d.room_type == t,
                                {t.label()}
                            }
                        }
                    }
                }
                label { "Capacity"
                    input {
                        r#type: "number",
                        min: "1",
                        value: "{d.capacity}",
                        oninput: move |evt: Event<FormData>| {
                            draft.write().capacity = evt.value().trim().parse().unwrap_or(0);
                        },
                    }
                }
            }
            label { "Description"
                textarea {
                    rows: "3",
                    value: "{d.description}",
                    oninput: move |evt: Event<FormData>| draft.write().description = evt.value(),
                }
            }
            label { "Amenities (comma separated)"
                input {
                    r#type: "text",
                    value: "{amenities}",
                    oninput: move |evt: Event<FormData>| {
                        let text = evt.value();
                        draft.write().set_amenities_from_text(&text);
                        amenities.set(text);
                    },
                }
            }

            div { class: "map-fields",
                span { "Position {position}" }
                span {
                    if path_len > 0 { "Route: {path_len} points" } else { "No route" }
                }
            }
            div { class: "button-row",
                button {
                    class: "secondary",
                    disabled: busy,
                    onclick: move |_| on_trace.call(()),
                    if path_len > 0 { "Edit route" } else { "Trace route" }
                }
                button {
                    class: "secondary",
                    disabled: busy,
                    title: if path_len > 0 { "Moving the room clears its route" } else { "" },
                    onclick: move |_| on_place.call(()),
                    "Place on map"
                }
                if path_len > 0 {
                    button {
                        class: "secondary",
                        disabled: busy,
                        onclick: move |_| on_clear_path.call(()),
                        "Clear route"
                    }
                }
            }

            if !errors.is_empty() {
                ul { class: "form-errors",
                    for e in errors.iter() {
                        li { "{e}" }
                    }
                }
            }

            div { class: "button-row",
                button {
                    disabled: busy || saving,
                    onclick: move |_| on_save.call(()),
                    if saving { "Saving..." } else { "Save" }
                }
                button {
                    class: "secondary",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
            }
        }
    }
}
