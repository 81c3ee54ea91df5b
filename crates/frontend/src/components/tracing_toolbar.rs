use campus_map_shared::interaction::InteractionMode;
use dioxus::prelude::*;

/// Floating bar over the map while a route is traced or a position picked.
#[component]
pub fn TracingToolbar(
    mode: InteractionMode,
    points: usize,
    warnings: Vec<String>,
    errors: Vec<String>,
    on_undo: EventHandler<()>,
    on_finish: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let label = mode.label();
    match mode {
        InteractionMode::Browse => rsx! {},
        InteractionMode::Placing => rsx! {
            div { class: "tracing-toolbar",
                span { class: "mode-label", "Click the map to place the room" }
                button { class: "secondary", onclick: move |_| on_cancel.call(()), "Cancel" }
            }
        },
        InteractionMode::Tracing => rsx! {
            div { class: "tracing-toolbar",
                span { class: "mode-label", "{label}: {points} point(s)" }
                span { class: "hint", "Click to add points. Shift-drag or right-drag to pan." }
                div { class: "button-row",
                    button {
                        class: "secondary",
                        disabled: points == 0,
                        onclick: move |_| on_undo.call(()),
                        "Undo point"
                    }
                    button { onclick: move |_| on_finish.call(()), "Finish" }
                    button { class: "secondary", onclick: move |_| on_cancel.call(()), "Cancel" }
                }
                for w in warnings.iter() {
                    div { class: "path-warning", "{w}" }
                }
                for e in errors.iter() {
                    div { class: "path-error", "{e}" }
                }
            }
        },
    }
}
