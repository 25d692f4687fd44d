//! Verified request principal
//!
//! The [`Principal`] extractor is the vault access gate's front door: it
//! pulls the bearer token, checks signature and expiry, then re-confirms the
//! bound account still exists in the store. The store check runs on every
//! request, so a deleted account invalidates outstanding sessions
//! immediately. Handlers receive the verified username as an explicit value
//! rather than digging it out of request state.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, RequestPartsExt};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;

use common::prelude::Username;

use crate::ServiceState;

/// The authenticated account for the current request.
#[derive(Debug, Clone)]
pub struct Principal(Username);

impl Principal {
    pub fn username(&self) -> &Username {
        &self.0
    }
}

/// Rejection for requests that fail session verification.
#[derive(Debug, thiserror::Error)]
pub enum AuthRejection {
    /// Uniform for missing, malformed, forged, and expired tokens, and for
    /// tokens bound to accounts that no longer exist.
    #[error("invalid or expired session token")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "invalid or expired session token"})),
            )
                .into_response(),
            AuthRejection::Database(e) => {
                tracing::error!("session verification store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "internal server error"})),
                )
                    .into_response()
            }
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<ServiceState> for Principal {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthRejection::Unauthorized)?;

        let subject = state
            .session_keys()
            .verify(bearer.token())
            .map_err(|_| AuthRejection::Unauthorized)?;

        // Tokens are only minted for validated usernames, but the subject
        // comes off the wire, so parse rather than trust.
        let username = Username::parse(&subject).map_err(|_| AuthRejection::Unauthorized)?;

        if !state.database().account_exists(&username).await? {
            return Err(AuthRejection::Unauthorized);
        }

        Ok(Principal(username))
    }
}
