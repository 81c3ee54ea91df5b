use campus_map_shared::models::{Project, ProjectDraft, ProjectId, RoomId};
use dioxus::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Editing {
    id: ProjectId,
    name: String,
    description: String,
}

/// Projects hosted in the selected room. Admins can add, rename and remove them.
#[component]
pub fn ProjectPanel(
    room_id: RoomId,
    projects: Vec<Project>,
    is_admin: bool,
    on_create: EventHandler<ProjectDraft>,
    on_update: EventHandler<(ProjectId, ProjectDraft)>,
    on_delete: EventHandler<ProjectId>,
) -> Element {
    let mut new_name = use_signal(String::new);
    let mut new_description = use_signal(String::new);
    let mut editing = use_signal(|| None::<Editing>);

    let current_edit = editing.read().clone();
    let create_room = room_id.clone();

    rsx! {
        div { class: "panel project-panel",
            h3 { "Projects" }
            if projects.is_empty() {
                p { class: "muted", "No projects in this room" }
            }
            ul {
                for project in projects {
                    li { key: "{project.id}",
                        if current_edit.as_ref().is_some_and(|e| e.id == project.id) {
                            ProjectEditRow {
                                editing: editing,
                                room_id: room_id.clone(),
                                on_update: on_update,
                            }
                        } else {
                            div { class: "project-row",
                                strong { "{project.name}" }
                                if !project.description.is_empty() {
                                    span { class: "muted", " {project.description}" }
                                }
                                if is_admin {
                                    span { class: "row-actions",
                                        button {
                                            class: "icon",
                                            onclick: {
                                                let p = project.clone();
                                                move |_| editing.set(Some(Editing {
                                                    id: p.id.clone(),
                                                    name: p.name.clone(),
                                                    description: p.description.clone(),
                                                }))
                                            },
                                            "Edit"
                                        }
                                        button {
                                            class: "icon danger",
                                            onclick: {
                                                let id = project.id.clone();
                                                move |_| on_delete.call(id.clone())
                                            },
                                            "Delete"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            if is_admin {
                div { class: "project-new",
                    input {
                        r#type: "text",
                        placeholder: "Project name",
                        value: "{new_name}",
                        oninput: move |evt: Event<FormData>| new_name.set(evt.value()),
                    }
                    input {
                        r#type: "text",
                        placeholder: "Description",
                        value: "{new_description}",
                        oninput: move |evt: Event<FormData>| new_description.set(evt.value()),
                    }
                    button {
                        disabled: new_name.read().trim().is_empty(),
                        onclick: move |_| {
                            let draft = ProjectDraft {
                                name: new_name.read().trim().to_string(),
                                description: new_description.read().trim().to_string(),
                                room_id: Some(create_room.clone()),
                            };
                            on_create.call(draft);
                            new_name.set(String::new());
                            new_description.set(String::new());
                        },
                        "Add project"
                    }
                }
            }
        }
    }
}

#[component]
fn ProjectEditRow(
    editing: Signal<Option<Editing>>,
    room_id: RoomId,
    on_update: EventHandler<(ProjectId, ProjectDraft)>,
) -> Element {
    let Some(e) = editing.read().clone() else {
        return rsx! {};
    };

    rsx! {
        div { class: "project-edit",
            input {
                r#type: "text",
                value: "{e.name}",
                oninput: move |evt: Event<FormData>| {
                    if let Some(e) = editing.write().as_mut() {
                        e.name = evt.value();
                    }
                },
            }
            input {
                r#type: "text",
                value: "{e.description}",
                oninput: move |evt: Event<FormData>| {
                    if let Some(e) = editing.write().as_mut() {
                        e.description = evt.value();
                    }
                },
            }
            button {
                disabled: e.name.trim().is_empty(),
                onclick: move |_| {
                    let Some(e) = editing.write().take() else { return };
                    on_update.call((
                        e.id,
                        ProjectDraft {
                            name: e.name.trim().to_string(),
                            description: e.description.trim().to_string(),
                            room_id: Some(room_id.clone()),
                        },
                    ));
                },
                "Save"
            }
            button {
                class: "secondary",
                onclick: move |_| editing.set(None),
                "Cancel"
            }
        }
    }
}
