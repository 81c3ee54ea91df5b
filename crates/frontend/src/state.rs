//! App-wide state shared through the Dioxus context.

use campus_map_client::{ApiClient, ApiError, ClientConfig};
use campus_map_shared::models::AuthSession;
use dioxus::prelude::*;

use crate::components::toast::Notice;
use crate::config::AppConfig;
use crate::storage;

#[derive(Clone, Copy)]
pub struct AppState {
    pub config: Signal<AppConfig>,
    pub session: Signal<Option<AuthSession>>,
    pub notice: Signal<Option<Notice>>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            config: Signal::new(AppConfig::load()),
            session: Signal::new(storage::restore()),
            notice: Signal::new(None),
        }
    }

    /// Client carrying the current token, if any.
    pub fn client(&self) -> ApiClient {
        let mut config = ClientConfig::new(self.config.read().api_base_url.clone());
        if let Some(s) = self.session.read().as_ref() {
            config = config.with_token(s.token.clone());
        }
        ApiClient::new(&config)
    }

    pub fn is_admin(&self) -> bool {
        self.session.read().as_ref().is_some_and(AuthSession::is_admin)
    }

    pub fn sign_in(&mut self, auth: AuthSession) {
        storage::persist(&auth);
        self.session.set(Some(auth));
    }

    pub fn sign_out(&mut self) {
        storage::forget();
        self.session.set(None);
        tracing::info!("logged out");
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notice.set(Some(Notice::info(message)));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notice.set(Some(Notice::error(message)));
    }

    /// Show an API failure. A rejected token ends the session.
    pub fn report(&mut self, err: &ApiError) {
        tracing::warn!(error = %err, "request failed");
        if matches!(err, ApiError::Unauthorized) && self.session.read().is_some() {
            self.sign_out();
        }
        self.error(err.user_message());
    }
}
