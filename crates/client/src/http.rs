//! REST calls for rooms, projects, auth and health.

use campus_map_shared::models::{
    AuthSession, HealthStatus, LoginRequest, LoginResponse, Project, ProjectDraft, RegisterRequest,
    Room, RoomDraft,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiResult, ClientConfig};

/// Responses come either bare or wrapped in `{ "data": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Body<T> {
    Wrapped {
        #[serde(alias = "rooms", alias = "projects")]
        data: T,
    },
    Bare(T),
}

impl<T> Body<T> {
    fn into_inner(self) -> T {
        match self {
            Body::Wrapped { data } => data,
            Body::Bare(t) => t,
        }
    }
}

/// HTTP client for the campus map API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the bearer token, or refuse before anything hits the network.
    fn authed(&self, request: RequestBuilder) -> ApiResult<RequestBuilder> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
        Ok(request.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}")))
    }

    async fn send_raw(request: RequestBuilder) -> ApiResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let err = ApiError::from_status(status, &text);
            tracing::warn!(status = status.as_u16(), error = %err, "API request failed");
            return Err(err);
        }
        Ok(text)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
        let text = Self::send_raw(request).await?;
        serde_json::from_str::<Body<T>>(&text)
            .map(Body::into_inner)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn send_empty(request: RequestBuilder) -> ApiResult<()> {
        Self::send_raw(request).await.map(|_| ())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        Self::send(self.client.get(self.url(path))).await
    }

    async fn post_authed<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        let request = self.authed(self.client.post(self.url(path)).json(body))?;
        Self::send_empty(request).await
    }

    async fn put_authed<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        let request = self.authed(self.client.put(self.url(path)).json(body))?;
        Self::send_empty(request).await
    }

    async fn delete_authed(&self, path: &str) -> ApiResult<()> {
        let request = self.authed(self.client.delete(self.url(path)))?;
        Self::send_empty(request).await
    }

    // ========== Rooms ==========

    pub async fn list_rooms(&self) -> ApiResult<Vec<Room>> {
        let rooms: Vec<Room> = self.get("/api/room").await?;
        tracing::debug!(count = rooms.len(), "rooms loaded");
        Ok(rooms)
    }

    pub async fn get_room(&self, id: &str) -> ApiResult<Room> {
        self.get(&format!("/api/room/{id}")).await
    }

    pub async fn create_room(&self, draft: &RoomDraft) -> ApiResult<()> {
        self.post_authed("/api/room", draft).await?;
        tracing::info!(name = %draft.name, "room created");
        Ok(())
    }

    pub async fn update_room(&self, id: &str, draft: &RoomDraft) -> ApiResult<()> {
        self.put_authed(&format!("/api/room/{id}"), draft).await?;
        tracing::info!(id, "room updated");
        Ok(())
    }

    pub async fn delete_room(&self, id: &str) -> ApiResult<()> {
        self.delete_authed(&format!("/api/room/{id}")).await?;
        tracing::info!(id, "room deleted");
        Ok(())
    }

    // ========== Projects ==========

    pub async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.get("/api/project").await
    }

    pub async fn create_project(&self, draft: &ProjectDraft) -> ApiResult<()> {
        self.post_authed("/api/project", draft).await?;
        tracing::info!(name = %draft.name, "project created");
        Ok(())
    }

    pub async fn update_project(&self, id: &str, draft: &ProjectDraft) -> ApiResult<()> {
        self.put_authed(&format!("/api/project/{id}"), draft).await?;
        tracing::info!(id, "project updated");
        Ok(())
    }

    pub async fn delete_project(&self, id: &str) -> ApiResult<()> {
        self.delete_authed(&format!("/api/project/{id}")).await?;
        tracing::info!(id, "project deleted");
        Ok(())
    }

    // ========== Auth ==========

    /// Log in and adopt the returned token for later calls.
    pub async fn login(&mut self, email: &str, password: &str) -> ApiResult<AuthSession> {
        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let request = self.client.post(self.url("/auth/login")).json(&body);
        let response: LoginResponse = Self::send(request).await.map_err(|e| match e {
            ApiError::Unauthorized => ApiError::InvalidCredentials,
            other => other,
        })?;
        let session = AuthSession::from(response);
        self.token = Some(session.token.clone());
        tracing::info!(admin = session.is_admin(), "logged in");
        Ok(session)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        Self::send_empty(self.client.post(self.url("/auth/register")).json(request)).await?;
        tracing::info!("account registered");
        Ok(())
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    // ========== Health ==========

    /// A 2xx with an unrecognised body still counts as healthy.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        let text = Self::send_raw(self.client.get(self.url("/health"))).await?;
        Ok(serde_json::from_str(&text).unwrap_or_else(|_| HealthStatus {
            status: "ok".to_string(),
        }))
    }
}
