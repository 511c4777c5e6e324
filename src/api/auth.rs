//! api::auth
//!
//! Client for the unauthenticated credential-exchange endpoints.
//!
//! # Endpoints
//!
//! - `POST /auth/login` - email/password exchange
//! - `POST /auth/code` - third-party authorization-code exchange
//! - `POST /auth/refresh` - refresh-token exchange; the server may
//!   rotate the refresh token, and a 401 here means the session is
//!   irrecoverable
//!
//! # Security
//!
//! Response types carrying tokens implement custom Debug to redact
//! their values.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::session::coordinator::{RefreshBackend, RefreshedTokens};
use crate::session::errors::SessionError;

use super::channels::PublicChannel;

/// Login endpoint path.
const LOGIN_PATH: &str = "/auth/login";

/// Third-party code exchange endpoint path.
const CODE_EXCHANGE_PATH: &str = "/auth/code";

/// Refresh endpoint path.
const REFRESH_PATH: &str = "/auth/refresh";

/// Credential pair returned by the login endpoints.
///
/// Both tokens are always present; partial pairs do not exist on the
/// wire.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,

    /// Longer-lived refresh token.
    pub refresh_token: String,
}

// Custom Debug to avoid exposing token values
impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Response from the refresh endpoint.
///
/// Refresh-token rotation is optional; when the field is absent the
/// existing refresh token remains valid.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshExchange {
    /// The new access token.
    pub access_token: String,

    /// Rotated refresh token, if the server issued one.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// Custom Debug to avoid exposing token values
impl fmt::Debug for RefreshExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshExchange")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Request body for the login endpoint.
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Request body for the code exchange endpoint.
#[derive(Serialize)]
struct CodeExchangeRequest<'a> {
    code: &'a str,
}

/// Request body for the refresh endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// JSON error body returned by the auth endpoints.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for credential exchange on the public channel.
#[derive(Clone, Debug)]
pub struct AuthApi {
    channel: PublicChannel,
}

impl AuthApi {
    /// Create an auth client over a shared HTTP client and base URL.
    pub fn new(http: Client, base: impl Into<String>) -> Self {
        Self {
            channel: PublicChannel::new(http, base),
        }
    }

    /// Exchange email and password for a credential pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, SessionError> {
        let response = self
            .channel
            .post_json(LOGIN_PATH, &LoginRequest { email, password })
            .await?;
        Self::credential_response(response).await
    }

    /// Exchange a third-party authorization code for a credential pair.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenPair, SessionError> {
        let response = self
            .channel
            .post_json(CODE_EXCHANGE_PATH, &CodeExchangeRequest { code })
            .await?;
        Self::credential_response(response).await
    }

    /// Decode a credential-pair response, mapping rejections to
    /// [`SessionError::LoginFailed`].
    async fn credential_response(response: Response) -> Result<TokenPair, SessionError> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| SessionError::Api {
                status: status.as_u16(),
                message: format!("failed to parse login response: {}", e),
            });
        }

        let message = Self::read_message(response).await;
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(SessionError::LoginFailed(
                    message.unwrap_or_else(|| "invalid credentials".into()),
                ))
            }
            _ => Err(SessionError::Api {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| "unknown error".into()),
            }),
        }
    }

    async fn read_message(response: Response) -> Option<String> {
        response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| body.message)
    }
}

#[async_trait]
impl RefreshBackend for AuthApi {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, SessionError> {
        let response = self
            .channel
            .post_json(REFRESH_PATH, &RefreshRequest { refresh_token })
            .await?;

        let status = response.status();
        if status.is_success() {
            let exchange: RefreshExchange =
                response.json().await.map_err(|e| SessionError::Api {
                    status: status.as_u16(),
                    message: format!("failed to parse refresh response: {}", e),
                })?;
            return Ok(RefreshedTokens {
                access_token: exchange.access_token,
                refresh_token: exchange.refresh_token,
            });
        }

        let message = Self::read_message(response)
            .await
            .unwrap_or_else(|| "unknown error".into());
        Err(SessionError::RefreshFailed(format!(
            "{}: {}",
            status.as_u16(),
            message
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_pair_deserialize() {
        let json = r#"{
            "accessToken": "tok_abc",
            "refreshToken": "ref_xyz"
        }"#;

        let pair: TokenPair = serde_json::from_str(json).expect("parse");
        assert_eq!(pair.access_token, "tok_abc");
        assert_eq!(pair.refresh_token, "ref_xyz");
    }

    #[test]
    fn refresh_exchange_with_rotation() {
        let json = r#"{
            "accessToken": "tok_new",
            "refreshToken": "ref_new"
        }"#;

        let exchange: RefreshExchange = serde_json::from_str(json).expect("parse");
        assert_eq!(exchange.access_token, "tok_new");
        assert_eq!(exchange.refresh_token.as_deref(), Some("ref_new"));
    }

    #[test]
    fn refresh_exchange_without_rotation() {
        let json = r#"{ "accessToken": "tok_new" }"#;

        let exchange: RefreshExchange = serde_json::from_str(json).expect("parse");
        assert_eq!(exchange.access_token, "tok_new");
        assert!(exchange.refresh_token.is_none());
    }

    #[test]
    fn login_request_serializes_plain_fields() {
        let body = serde_json::to_value(LoginRequest {
            email: "a@example.com",
            password: "pw",
        })
        .expect("serialize");

        assert_eq!(body["email"], "a@example.com");
        assert_eq!(body["password"], "pw");
    }

    #[test]
    fn refresh_request_uses_camel_case() {
        let body = serde_json::to_value(RefreshRequest {
            refresh_token: "ref_xyz",
        })
        .expect("serialize");

        assert_eq!(body["refreshToken"], "ref_xyz");
    }

    #[test]
    fn debug_output_does_not_expose_tokens() {
        let pair = TokenPair {
            access_token: "tok_secret".into(),
            refresh_token: "ref_secret".into(),
        };
        let debug_output = format!("{:?}", pair);
        assert!(!debug_output.contains("tok_secret"));
        assert!(!debug_output.contains("ref_secret"));

        let exchange = RefreshExchange {
            access_token: "tok_secret".into(),
            refresh_token: Some("ref_secret".into()),
        };
        let debug_output = format!("{:?}", exchange);
        assert!(!debug_output.contains("tok_secret"));
        assert!(!debug_output.contains("ref_secret"));
    }
}
