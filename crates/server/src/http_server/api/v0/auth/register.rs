use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Username, UsernameError};

use crate::auth::SessionTokenError;
use crate::database::AccountStoreError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Account identifier, 4-32 chars, alphanumeric plus underscore
    pub username: String,
    /// Client-derived master token; opaque to the server
    pub master_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Session credential bound to the new account
    pub token: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, RegisterError> {
    // Validate before touching the store. The master token is an opaque
    // derived secret; the only legal check is non-emptiness.
    let username = Username::parse(&req.username)?;
    if req.master_token.is_empty() {
        return Err(RegisterError::EmptyMasterToken);
    }

    tracing::info!(username = %username, "REGISTER: creating account");

    let auto_lock_time_interval = state
        .database()
        .create_account(&username, &req.master_token)
        .await
        .map_err(|e| match e {
            AccountStoreError::UsernameTaken => RegisterError::UsernameTaken,
            AccountStoreError::Database(e) => RegisterError::Database(e),
        })?;

    let token = state
        .session_keys()
        .mint(&username, auto_lock_time_interval)?;

    tracing::info!(username = %username, "REGISTER: account created");
    Ok((StatusCode::CREATED, Json(RegisterResponse { token })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error(transparent)]
    InvalidUsername(#[from] UsernameError),
    #[error("master token must be a non-empty string")]
    EmptyMasterToken,
    #[error("username already taken")]
    UsernameTaken,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Session(#[from] SessionTokenError),
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        match self {
            RegisterError::InvalidUsername(_) | RegisterError::EmptyMasterToken => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": self.to_string()})),
            )
                .into_response(),
            RegisterError::UsernameTaken => (
                StatusCode::CONFLICT,
                Json(serde_json::json!({"error": "username already taken"})),
            )
                .into_response(),
            RegisterError::Database(e) => {
                tracing::error!("REGISTER: store failure: {}", e);
                internal_error()
            }
            RegisterError::Session(e) => {
                tracing::error!("REGISTER: session minting failure: {}", e);
                internal_error()
            }
        }
    }
}

// Store and signing failures surface as an opaque 500; internals never
// reach the client.
fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "internal server error"})),
    )
        .into_response()
}

// Client implementation - builds request for this operation
impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/auth/register").unwrap();
        client.post(full_url).json(&self)
    }
}
