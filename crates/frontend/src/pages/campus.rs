use campus_map_shared::filter::{self, RoomFilter};
use campus_map_shared::interaction::{InteractionMode, MapAction, MapInteraction};
use campus_map_shared::models::{self, Point, Project, ProjectDraft, ProjectId, Room, RoomDraft, RoomId};
use campus_map_shared::path::PathError;
use dioxus::prelude::*;

use crate::components::help_overlay::HelpOverlay;
use crate::components::map_view::MapView;
use crate::components::project_panel::ProjectPanel;
use crate::components::room_details::RoomDetails;
use crate::components::room_form::RoomForm;
use crate::components::room_list::RoomList;
use crate::components::toast::Toast;
use crate::components::tracing_toolbar::TracingToolbar;
use crate::state::AppState;
use crate::Route;

/// Room being created (`room_id == None`) or edited.
#[derive(Debug, Clone, Default, PartialEq)]
struct Editor {
    room_id: Option<RoomId>,
    errors: Vec<String>,
    saving: bool,
}

fn path_error_lines(err: &PathError) -> Vec<String> {
    match err {
        PathError::Invalid(issues) => issues.iter().map(ToString::to_string).collect(),
        other => vec![other.to_string()],
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[component]
pub fn Campus() -> Element {
    let mut app = use_context::<AppState>();

    // Data resources (re-run when the session changes, since the client carries the token)
    let mut rooms_resource = use_resource(move || {
        let client = app.client();
        async move { client.list_rooms().await }
    });
    let mut projects_resource = use_resource(move || {
        let client = app.client();
        async move { client.list_projects().await }
    });
    let health_resource = use_resource(move || {
        let client = app.client();
        async move { client.health().await }
    });

    // UI state
    let mut interaction = use_signal(MapInteraction::default);
    let filter = use_signal(RoomFilter::default);
    let mut selected = use_signal(|| None::<RoomId>);
    let mut editor = use_signal(|| None::<Editor>);
    let mut draft = use_signal(RoomDraft::default);
    let mut path_errors = use_signal(Vec::<String>::new);
    let mut show_help = use_signal(|| false);

    let (rooms, load_error): (Vec<Room>, Option<String>) = match &*rooms_resource.read() {
        Some(Ok(r)) => (r.clone(), None),
        Some(Err(e)) => (vec![], Some(e.user_message())),
        None => (vec![], None),
    };
    let projects: Vec<Project> = match &*projects_resource.read() {
        Some(Ok(p)) => p.clone(),
        _ => vec![],
    };
    let (health_class, health_label) = match &*health_resource.read() {
        Some(Ok(h)) if h.is_ok() => ("health ok", "API online"),
        Some(Ok(_)) => ("health degraded", "API degraded"),
        Some(Err(_)) => ("health down", "API offline"),
        None => ("health unknown", "Checking API..."),
    };

    let session = app.session.read().clone();
    let is_admin = app.is_admin();
    let current_filter = filter.read().clone();
    let editing = editor.read().clone();
    let (mode, point_count, validation) = {
        let m = interaction.read();
        (m.mode(), m.traced_points().len(), m.tracer().validate())
    };

    // Resolves to None once the selected room is gone from the data
    let selected_room: Option<Room> = selected
        .read()
        .as_ref()
        .and_then(|id| rooms.iter().find(|r| &r.id == id))
        .cloned();

    let filtered = current_filter.apply(&rooms);
    let route: Option<Vec<Point>> = match (&editing, mode) {
        (_, InteractionMode::Tracing) => None,
        (Some(_), _) => draft.read().path.clone().filter(|p| p.len() >= 2),
        (None, _) => filter::relevant_route(
            selected_room.as_ref(),
            &filtered,
            current_filter.is_active(),
        )
        .map(<[Point]>::to_vec),
    };
    let editing_id = editing.as_ref().and_then(|e| e.room_id.clone());
    let markers: Vec<Room> = filtered
        .iter()
        .filter(|r| editing_id.as_deref() != Some(r.id.as_str()))
        .map(|r| (*r).clone())
        .collect();
    let pending = editing.as_ref().map(|_| draft.read().position());

    let warnings: Vec<String> = validation.warnings.iter().map(ToString::to_string).collect();
    let errors = path_errors.read().clone();

    // --- Actions shared by buttons and keyboard shortcuts ---

    let mut finish_route = move || {
        let result = interaction.write().finish_path();
        match result {
            Ok(path) => {
                for w in path.warnings() {
                    tracing::warn!(%w, "route finished with warning");
                }
                let count = path.points().len();
                draft.write().apply_path(path);
                path_errors.set(Vec::new());
                app.info(format!("Route with {count} points attached"));
            }
            Err(e) => path_errors.set(path_error_lines(&e)),
        }
    };

    let mut cancel_mode = move || {
        interaction.write().cancel_mode();
        path_errors.set(Vec::new());
    };

    let mut save_room = move || {
        let Some(ed) = editor.read().clone() else { return };
        let d = draft.read().clone();
        if let Err(errs) = d.validate() {
            if let Some(e) = editor.write().as_mut() {
                e.errors = errs.iter().map(ToString::to_string).collect();
            }
            return;
        }
        if let Some(e) = editor.write().as_mut() {
            e.errors.clear();
            e.saving = true;
        }
        let client = app.client();
        spawn(async move {
            let result = match &ed.room_id {
                Some(id) => client.update_room(id, &d).await,
                None => client.create_room(&d).await,
            };
            match result {
                Ok(()) => {
                    editor.set(None);
                    app.info(format!("Saved {}", d.name));
                    rooms_resource.restart();
                }
                Err(e) => {
                    app.report(&e);
                    if let Some(ed) = editor.write().as_mut() {
                        ed.saving = false;
                    }
                }
            }
        });
    };

    let mut open_editor = move |room: Option<Room>| {
        interaction.write().cancel_mode();
        path_errors.set(Vec::new());
        match room {
            Some(r) => {
                draft.set(r.to_draft());
                editor.set(Some(Editor {
                    room_id: Some(r.id.clone()),
                    ..Editor::default()
                }));
            }
            None => {
                draft.set(RoomDraft::default());
                selected.set(None);
                editor.set(Some(Editor::default()));
            }
        }
    };

    let on_map_action = move |action: MapAction| match action {
        MapAction::SelectRoom(id) => {
            if editor.read().is_none() {
                selected.set(Some(id));
            }
        }
        MapAction::ClearSelection => {
            if editor.read().is_none() {
                selected.set(None);
            }
        }
        MapAction::PathPointAdded { .. } => path_errors.set(Vec::new()),
        MapAction::PositionPicked(p) => draft.write().set_position(p),
        MapAction::None => {}
    };

    // --- Sidebar ---

    let sidebar = if let Some(ed) = &editing {
        let form_key = ed.room_id.clone().unwrap_or_default();
        rsx! {
            RoomForm {
                key: "{form_key}",
                draft: draft,
                is_new: ed.room_id.is_none(),
                errors: ed.errors.clone(),
                mode: mode,
                saving: ed.saving,
                on_trace: move |_| {
                    let existing = draft.read().path.clone();
                    match existing {
                        Some(points) => interaction.write().resume_tracing(&points),
                        None => interaction.write().start_tracing(),
                    }
                    path_errors.set(Vec::new());
                },
                on_place: move |_| interaction.write().start_placing(),
                on_clear_path: move |_| draft.write().path = None,
                on_save: move |_| save_room(),
                on_cancel: move |_| {
                    cancel_mode();
                    editor.set(None);
                },
            }
        }
    } else {
        let details = selected_room.clone().map(|room| {
            let room_projects: Vec<Project> = models::projects_for_room(&projects, &room.id)
                .into_iter()
                .cloned()
                .collect();
            let room_id = room.id.clone();
            let delete_id = room.id.clone();
            let delete_name = room.name.clone();
            let edit_room = room.clone();
            rsx! {
                RoomDetails {
                    room: room,
                    is_admin: is_admin,
                    on_edit: move |_| open_editor(Some(edit_room.clone())),
                    on_delete: move |_| {
                        if !confirm(&format!("Delete {delete_name}?")) {
                            return;
                        }
                        let client = app.client();
                        let id = delete_id.clone();
                        spawn(async move {
                            match client.delete_room(&id).await {
                                Ok(()) => {
                                    selected.set(None);
                                    app.info("Room deleted");
                                    rooms_resource.restart();
                                }
                                Err(e) => app.report(&e),
                            }
                        });
                    },
                    on_close: move |_| selected.set(None),
                }
                ProjectPanel {
                    key: "{room_id}",
                    room_id: room_id.clone(),
                    projects: room_projects,
                    is_admin: is_admin,
                    on_create: move |d: ProjectDraft| {
                        let client = app.client();
                        spawn(async move {
                            match client.create_project(&d).await {
                                Ok(()) => {
                                    app.info(format!("Added {}", d.name));
                                    projects_resource.restart();
                                }
                                Err(e) => app.report(&e),
                            }
                        });
                    },
                    on_update: move |(id, d): (ProjectId, ProjectDraft)| {
                        let client = app.client();
                        spawn(async move {
                            match client.update_project(&id, &d).await {
                                Ok(()) => projects_resource.restart(),
                                Err(e) => app.report(&e),
                            }
                        });
                    },
                    on_delete: move |id: ProjectId| {
                        if !confirm("Delete this project?") {
                            return;
                        }
                        let client = app.client();
                        spawn(async move {
                            match client.delete_project(&id).await {
                                Ok(()) => projects_resource.restart(),
                                Err(e) => app.report(&e),
                            }
                        });
                    },
                }
            }
        });
        rsx! {
            RoomList { rooms: rooms.clone(), filter: filter, selected: selected }
            {details}
        }
    };

    rsx! {
        div { class: "app",
            // Header
            div { class: "header",
                h1 { "Campus Map" }
                span { class: "{health_class}", title: "{health_label}", "{health_label}" }
                div { class: "header-actions",
                    if is_admin && editing.is_none() {
                        button { onclick: move |_| open_editor(None), "New room" }
                    }
                    {match &session {
                        Some(s) => {
                            let user_name = s.user.name.clone();
                            let admin = s.is_admin();
                            rsx! {
                                span { class: "user-name",
                                    "{user_name}"
                                    if admin { span { class: "badge", "admin" } }
                                }
                                button {
                                    class: "secondary",
                                    onclick: move |_| {
                                        cancel_mode();
                                        editor.set(None);
                                        app.sign_out();
                                    },
                                    "Log out"
                                }
                            }
                        }
                        None => rsx! {
                            Link { class: "button", to: Route::Login {}, "Log in" }
                        },
                    }}
                }
            }

            Toast { notice: app.notice }

            if let Some(msg) = load_error {
                div { class: "load-error",
                    span { "Could not load rooms: {msg}" }
                    button { onclick: move |_| rooms_resource.restart(), "Retry" }
                }
            }

            div { class: "sidebar", {sidebar} }

            // Map area: keyboard shortcuts apply while it has focus
            div {
                class: "map-area",
                onkeydown: move |evt: Event<KeyboardData>| {
                    let tracing_now = interaction.peek().mode() == InteractionMode::Tracing;
                    match evt.key() {
                        Key::Escape => {
                            if *show_help.read() {
                                show_help.set(false);
                            } else {
                                cancel_mode();
                            }
                        }
                        Key::Backspace if tracing_now => {
                            evt.prevent_default();
                            interaction.write().remove_last_point();
                            path_errors.set(Vec::new());
                        }
                        Key::Enter if tracing_now => finish_route(),
                        Key::Character(c) => match c.as_str() {
                            "r" | "R" => interaction.write().reset_view(),
                            "+" | "=" => {
                                interaction.write().zoom_in();
                            }
                            "-" | "_" => {
                                interaction.write().zoom_out();
                            }
                            "h" | "H" | "?" => {
                                let open = *show_help.read();
                                show_help.set(!open);
                            }
                            _ => {}
                        },
                        _ => {}
                    }
                },

                MapView {
                    image_url: app.config.read().map_image_url.clone(),
                    interaction: interaction,
                    rooms: markers,
                    selected: selected.read().clone(),
                    route: route,
                    pending: pending,
                    on_action: on_map_action,
                }

                TracingToolbar {
                    mode: mode,
                    points: point_count,
                    warnings: warnings,
                    errors: errors,
                    on_undo: move |_| {
                        interaction.write().remove_last_point();
                        path_errors.set(Vec::new());
                    },
                    on_finish: move |_| finish_route(),
                    on_cancel: move |_| cancel_mode(),
                }

                div { class: "zoom-controls",
                    button {
                        "aria-label": "Zoom in",
                        onclick: move |_| {
                            interaction.write().zoom_in();
                        },
                        "+"
                    }
                    button {
                        "aria-label": "Zoom out",
                        onclick: move |_| {
                            interaction.write().zoom_out();
                        },
                        "−"
                    }
                    button {
                        "aria-label": "Reset view",
                        onclick: move |_| interaction.write().reset_view(),
                        "⟲"
                    }
                    button {
                        "aria-label": "Help",
                        onclick: move |_| show_help.set(true),
                        "?"
                    }
                }
            }

            HelpOverlay { show: show_help }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_map_shared::path::PathIssue;

    #[test]
    fn test_path_error_lines_expand_issues() {
        let err = PathError::Invalid(vec![
            PathIssue::NonFinite { index: 0 },
            PathIssue::OutOfBounds {
                index: 2,
                x: 120.0,
                y: 5.0,
            },
        ]);
        let lines = path_error_lines(&err);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains('3'), "{}", lines[1]);
    }

    #[test]
    fn test_path_error_lines_single_message() {
        let lines = path_error_lines(&PathError::TooFewPoints(1));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("at least 2"));
    }
}
