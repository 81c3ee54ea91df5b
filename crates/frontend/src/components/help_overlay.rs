use dioxus::prelude::*;

#[component]
pub fn HelpOverlay(show: Signal<bool>) -> Element {
    if !*show.read() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "help-overlay-backdrop",
            onclick: move |_| show.set(false),

            div {
                class: "help-overlay",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

                h2 { "Help" }

                // --- Keyboard shortcuts (map focused) ---

                div { class: "shortcut-section",
                    h3 { "View" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "+" } " / " kbd { "-" } }
                        span { "Zoom in / out around the centre" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "R" } }
                        span { "Reset zoom & pan" }
                    }
                }

                div { class: "shortcut-section",
                    h3 { "Route tracing" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "Enter" } }
                        span { "Finish the route" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "Backspace" } }
                        span { "Remove the last point" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "Esc" } }
                        span { "Cancel tracing or placing / close help" }
                    }
                }

                div { class: "shortcut-section",
                    h3 { "Help" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "H" } " / " kbd { "?" } }
                        span { "Toggle this help" }
                    }
                }

                div { class: "help-divider" }

                div { class: "help-info-section",
                    h3 { "Map Interactions" }
                    p { "Scroll to zoom around the cursor. Drag to pan; while tracing or placing, pan with Shift-drag, right-drag or middle-drag. Double-click resets the view. Click a marker to see the room and its projects." }
                }

                div { class: "help-info-section",
                    h3 { "Routes" }
                    p { "A route is a sequence of clicked points ending at the room. It needs at least two points. Points closer than 3 map units or routes longer than 15 points are allowed but flagged. The room moves to the last point when the route is finished." }
                }

                button {
                    class: "close-help",
                    onclick: move |_| show.set(false),
                    "Close"
                }
            }
        }
    }
}
