//! HTTP gateway to the task-board REST API.
//!
//! One method per endpoint, JSON request/response bodies, bearer-token
//! authentication. Responses are classified into the client's error
//! taxonomy here so callers never inspect status codes themselves.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use url::Url;

use taskdeck_api::activity::Activity;
use taskdeck_api::auth::{Credentials, LoginResponse, Registration};
use taskdeck_api::comment::{Comment, NewComment};
use taskdeck_api::task::{MoveRequest, Task, TaskDraft, TaskFilter, TaskPatch};
use taskdeck_api::user::User;

/// Default per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client-side error taxonomy for API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (connection refused, timeout, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server rejected the credential (401-class response).
    ///
    /// Carries the server's own message so the login path can show it
    /// verbatim. On authenticated calls callers must treat this as session
    /// termination, not as a user-facing notification.
    #[error("{0}")]
    Unauthorized(String),

    /// The referenced task/comment/user does not exist.
    #[error("not found")]
    NotFound,

    /// The server rejected the request body (4xx with an error message).
    #[error("{0}")]
    Validation(String),

    /// The server failed internally (5xx).
    #[error("server error: {0}")]
    Server(String),
}

/// HTTP client for the task-board API.
///
/// Holds the base URL and the current bearer credential. The credential is
/// attached to every call when present; unauthenticated calls (login,
/// register) skip it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client for the given API base URL.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base: base_url.as_str().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Sets or clears the bearer credential for subsequent calls.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Returns the current bearer credential, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // -- Tasks -------------------------------------------------------------

    /// `GET /api/tasks` with the filter rendered as query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the response classification.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ApiError> {
        let resp = self
            .authed(self.http.get(self.endpoint("/api/tasks")))
            .query(&filter.to_query())
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    /// `POST /api/tasks`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a rejected draft (e.g. blank
    /// title), or the usual classification otherwise.
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        let resp = self
            .authed(self.http.post(self.endpoint("/api/tasks")))
            .json(draft)
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    /// `PUT /api/tasks/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown task id.
    pub async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Task, ApiError> {
        let resp = self
            .authed(self.http.put(self.endpoint(&format!("/api/tasks/{id}"))))
            .json(patch)
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    /// `POST /api/tasks/{id}/move` (kanban drag-drop).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown task id.
    pub async fn move_task(&self, id: i64, mv: MoveRequest) -> Result<Task, ApiError> {
        let resp = self
            .authed(
                self.http
                    .post(self.endpoint(&format!("/api/tasks/{id}/move"))),
            )
            .json(&mv)
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    /// `DELETE /api/tasks/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown task id.
    pub async fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        let resp = self
            .authed(self.http.delete(self.endpoint(&format!("/api/tasks/{id}"))))
            .send()
            .await?;
        checked(resp).await?;
        Ok(())
    }

    // -- Comments ----------------------------------------------------------

    /// `GET /api/tasks/{id}/comments`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the response classification.
    pub async fn list_comments(&self, task_id: i64) -> Result<Vec<Comment>, ApiError> {
        let resp = self
            .authed(
                self.http
                    .get(self.endpoint(&format!("/api/tasks/{task_id}/comments"))),
            )
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    /// `POST /api/tasks/{id}/comments`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty comment body.
    pub async fn add_comment(
        &self,
        task_id: i64,
        comment: &NewComment,
    ) -> Result<Comment, ApiError> {
        let resp = self
            .authed(
                self.http
                    .post(self.endpoint(&format!("/api/tasks/{task_id}/comments"))),
            )
            .json(comment)
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    // -- Users & activities ------------------------------------------------

    /// `GET /api/users`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the response classification.
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let resp = self
            .authed(self.http.get(self.endpoint("/api/users")))
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    /// `GET /api/activities?limit=N`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the response classification.
    pub async fn list_activities(&self, limit: usize) -> Result<Vec<Activity>, ApiError> {
        let resp = self
            .authed(self.http.get(self.endpoint("/api/activities")))
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    // -- Auth ----------------------------------------------------------------

    /// `POST /api/auth/login`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] carrying the server's message
    /// for bad credentials.
    pub async fn login(&self, creds: &Credentials) -> Result<LoginResponse, ApiError> {
        let resp = self
            .http
            .post(self.endpoint("/api/auth/login"))
            .json(creds)
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    /// `POST /api/auth/register`.
    ///
    /// Registration alone does not authenticate; the session guard chains
    /// an automatic login call afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for duplicate usernames/emails or
    /// missing fields.
    pub async fn register(&self, reg: &Registration) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.endpoint("/api/auth/register"))
            .json(reg)
            .send()
            .await?;
        checked(resp).await?;
        Ok(())
    }

    /// `GET /api/auth/me` — validates the stored credential on startup.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for an expired or bogus token.
    pub async fn me(&self) -> Result<User, ApiError> {
        let resp = self
            .authed(self.http.get(self.endpoint("/api/auth/me")))
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    // -- Export ------------------------------------------------------------

    /// `GET /api/export/csv` — returns the raw CSV bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] per the response classification.
    pub async fn export_csv(&self) -> Result<Vec<u8>, ApiError> {
        let resp = self
            .authed(self.http.get(self.endpoint("/api/export/csv")))
            .send()
            .await?;
        Ok(checked(resp).await?.bytes().await?.to_vec())
    }
}

/// Classifies a response into the error taxonomy, passing 2xx through.
///
/// 4xx bodies carry `{"error": "..."}`; the message is surfaced verbatim
/// when present, with a generic fallback otherwise.
async fn checked(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized(
            error_message(resp, "authorization rejected").await,
        ));
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }

    let message = error_message(resp, "connection error, please try again").await;
    if status.is_server_error() {
        Err(ApiError::Server(message))
    } else {
        Err(ApiError::Validation(message))
    }
}

/// Extracts the server's `error` field, falling back to a generic message.
async fn error_message(resp: Response, fallback: &str) -> String {
    match resp.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("error")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| fallback.to_string(), str::to_string),
        Err(_) => fallback.to_string(),
    }
}
