mod components;
mod config;
mod pages;
mod state;
mod storage;

use dioxus::prelude::*;

use crate::state::AppState;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Campus {},
    #[route("/login")]
    Login {},
}

#[component]
fn Campus() -> Element {
    rsx! {
        pages::campus::Campus {}
    }
}

#[component]
fn Login() -> Element {
    rsx! {
        pages::login::Login {}
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    use_context_provider(AppState::new);

    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    dioxus::logger::initialize_default();
    launch(App);
}
