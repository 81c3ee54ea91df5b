use campus_map_shared::models::AuthSession;
use dioxus::prelude::*;

use crate::components::auth_form::AuthForm;
use crate::components::toast::Toast;
use crate::state::AppState;
use crate::Route;

#[component]
pub fn Login() -> Element {
    let mut app = use_context::<AppState>();
    let navigator = use_navigator();

    let signed_in = app.session.read().as_ref().map(|s| s.user.name.clone());

    rsx! {
        div { class: "login-page",
            div { class: "header",
                h1 { "Campus Map" }
                Link { class: "button secondary", to: Route::Campus {}, "Back to map" }
            }
            Toast { notice: app.notice }
            if let Some(name) = signed_in {
                div { class: "panel",
                    p { "Signed in as {name}." }
                    button {
                        class: "secondary",
                        onclick: move |_| app.sign_out(),
                        "Log out"
                    }
                }
            } else {
                AuthForm {
                    on_login: move |session: AuthSession| {
                        tracing::info!(user = %session.user.email, "signed in");
                        app.sign_in(session);
                        navigator.push(Route::Campus {});
                    },
                }
            }
        }
    }
}
