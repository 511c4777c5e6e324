//! api::channels
//!
//! The two request-issuing channels of the client.
//!
//! # Design
//!
//! Both channels share one `reqwest::Client` and the configured base
//! URL; they differ only in request decoration:
//!
//! - [`PublicChannel`]: no decoration. Used for credential exchange
//!   (login, code exchange, refresh), which must work without a session.
//! - [`PrivateChannel`]: attaches `Authorization: Bearer <token>` from
//!   the in-memory session (no storage read per request) and recovers
//!   once from a 401 by consulting the refresh coordinator.
//!
//! # Retry discipline
//!
//! `execute` carries a per-request one-shot marker: a request is
//! replayed at most once after a refresh, so a request that still fails
//! auth after the replay propagates its 401 instead of looping.
//! Transport errors (no response) are returned immediately and never
//! consult the coordinator.

use std::sync::Arc;

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::coordinator::{Recovery, RefreshCoordinator};
use crate::session::state::SessionHandle;

use super::error::ApiError;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "keeptab-client";

/// JSON error body returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Description of an outgoing private-channel request.
///
/// Kept separate from `reqwest::Request` so a replay rebuilds the
/// request from scratch with a different token.
#[derive(Debug, Clone)]
pub(crate) struct RequestSpec {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
}

impl RequestSpec {
    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub(crate) fn post(path: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body,
        }
    }
}

/// Unauthenticated channel for credential exchange.
#[derive(Clone, Debug)]
pub(crate) struct PublicChannel {
    http: Client,
    base: String,
}

impl PublicChannel {
    pub(crate) fn new(http: Client, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    /// POST a JSON body with no request decoration beyond content headers.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, reqwest::Error> {
        self.http
            .post(self.url(path))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .json(body)
            .send()
            .await
    }
}

/// Bearer-decorated channel for authenticated resources.
pub(crate) struct PrivateChannel {
    http: Client,
    base: String,
    session: Arc<SessionHandle>,
    coordinator: Arc<RefreshCoordinator>,
}

impl PrivateChannel {
    pub(crate) fn new(
        http: Client,
        base: impl Into<String>,
        session: Arc<SessionHandle>,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            http,
            base: base.into(),
            session,
            coordinator,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    /// Send one attempt of a request, decorated with the given token.
    ///
    /// Absence of a token is not an error here; the request goes out
    /// without an `Authorization` header and the server rejects it.
    async fn issue(&self, spec: &RequestSpec, token: Option<&str>) -> Result<Response, ApiError> {
        let mut request = self
            .http
            .request(spec.method.clone(), self.url(&spec.path))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .header("X-Request-Id", Uuid::new_v4().to_string());

        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    /// Issue a request, recovering at most once from a 401.
    ///
    /// The first attempt carries the latest in-memory token. On 401 the
    /// refresh coordinator is consulted; the replay carries whatever
    /// token it hands back (possibly none). A second 401 propagates.
    pub(crate) async fn execute(&self, spec: &RequestSpec) -> Result<Response, ApiError> {
        let mut token = self.session.access_token();
        let mut retried = false;
        loop {
            let response = self.issue(spec, token.as_deref()).await?;
            if response.status() == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                match self.coordinator.recover().await {
                    Recovery::Token(replay) => {
                        token = replay;
                        continue;
                    }
                    // Refresh failed for this caller; its original 401 is
                    // the error that surfaces.
                    Recovery::SessionExpired => return Err(error_from(response).await),
                }
            }
            return Ok(response);
        }
    }

    /// Issue a request and decode a JSON response.
    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
    ) -> Result<T, ApiError> {
        let response = self.execute(spec).await?;
        handle_response(response).await
    }
}

impl std::fmt::Debug for PrivateChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateChannel")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

/// Decode a successful JSON response, or map the error.
pub(crate) async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        response.json().await.map_err(|e| ApiError::Api {
            status: status.as_u16(),
            message: format!("failed to parse response: {}", e),
        })
    } else {
        Err(error_from(response).await)
    }
}

/// Map an error response to the API error taxonomy.
pub(crate) async fn error_from(response: Response) -> ApiError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .map(|body| body.message);

    match status {
        StatusCode::UNAUTHORIZED => {
            ApiError::AuthFailed(message.unwrap_or_else(|| "invalid or expired token".into()))
        }
        StatusCode::NOT_FOUND => {
            ApiError::NotFound(message.unwrap_or_else(|| "resource not found".into()))
        }
        _ => ApiError::Api {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| "unknown error".into()),
        },
    }
}
