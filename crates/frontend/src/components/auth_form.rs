use campus_map_shared::models::{AuthSession, RegisterRequest};
use dioxus::prelude::*;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthTab {
    Login,
    Register,
}

/// Login and registration. Registration switches back to login on success.
#[component]
pub fn AuthForm(on_login: EventHandler<AuthSession>) -> Element {
    let mut app = use_context::<AppState>();

    let mut tab = use_signal(|| AuthTab::Login);
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut pending = use_signal(|| false);

    let current_tab = *tab.read();
    let submit_label = match current_tab {
        AuthTab::Login => "Log in",
        AuthTab::Register => "Create account",
    };

    let submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        if *pending.read() {
            return;
        }
        let email_v = email.read().trim().to_string();
        let password_v = password.read().clone();
        let name_v = name.read().trim().to_string();
        if email_v.is_empty() || password_v.is_empty() {
            error.set(Some("Email and password are required".to_string()));
            return;
        }
        if current_tab == AuthTab::Register && name_v.is_empty() {
            error.set(Some("Name is required".to_string()));
            return;
        }

        error.set(None);
        pending.set(true);
        let mut client = app.client();
        spawn(async move {
            match current_tab {
                AuthTab::Login => match client.login(&email_v, &password_v).await {
                    Ok(session) => on_login.call(session),
                    Err(e) => error.set(Some(e.user_message())),
                },
                AuthTab::Register => {
                    let req = RegisterRequest {
                        name: name_v,
                        email: email_v,
                        password: password_v,
                    };
                    match client.register(&req).await {
                        Ok(()) => {
                            password.set(String::new());
                            tab.set(AuthTab::Login);
                            app.info("Account created, you can log in now");
                        }
                        Err(e) => error.set(Some(e.user_message())),
                    }
                }
            }
            pending.set(false);
        });
    };

    rsx! {
        div { class: "panel auth-form",
            div { class: "tabs",
                button {
                    class: if current_tab == AuthTab::Login { "tab active" } else { "tab" },
                    onclick: move |_| {
                        tab.set(AuthTab::Login);
                        error.set(None);
                    },
                    "Log in"
                }
                button {
                    class: if current_tab == AuthTab::Register { "tab active" } else { "tab" },
                    onclick: move |_| {
                        tab.set(AuthTab::Register);
                        error.set(None);
                    },
                    "Register"
                }
            }
            form { onsubmit: submit,
                if current_tab == AuthTab::Register {
                    label { "Name"
                        input {
                            r#type: "text",
                            autocomplete: "name",
                            value: "{name}",
                            oninput: move |evt: Event<FormData>| name.set(evt.value()),
                        }
                    }
                }
                label { "Email"
                    input {
                        r#type: "email",
                        autocomplete: "email",
                        value: "{email}",
                        oninput: move |evt: Event<FormData>| email.set(evt.value()),
                    }
                }
                label { "Password"
                    input {
                        r#type: "password",
                        autocomplete: if current_tab == AuthTab::Login { "current-password" } else { "new-password" },
                        value: "{password}",
                        oninput: move |evt: Event<FormData>| password.set(evt.value()),
                    }
                }
                if let Some(msg) = error.read().as_ref() {
                    p { class: "form-error", role: "alert", "{msg}" }
                }
                button { r#type: "submit", disabled: *pending.read(), "{submit_label}" }
            }
        }
    }
}
