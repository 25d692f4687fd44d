use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Username, UsernameError};

use crate::auth::SessionTokenError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    /// Client-derived master token; opaque to the server
    pub master_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session credential expiring after the account's auto-lock interval
    pub token: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, LoginError> {
    let username = Username::parse(&req.username)?;
    if req.master_token.is_empty() {
        return Err(LoginError::EmptyMasterToken);
    }

    // One lookup covers both "unknown username" and "wrong token", so the
    // failure path is uniform and usernames cannot be enumerated.
    let auto_lock_time_interval = state
        .database()
        .verify_credentials(&username, &req.master_token)
        .await?
        .ok_or(LoginError::InvalidCredentials)?;

    let token = state
        .session_keys()
        .mint(&username, auto_lock_time_interval)?;

    tracing::info!(username = %username, "LOGIN: session issued");
    Ok((StatusCode::OK, Json(LoginResponse { token })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    InvalidUsername(#[from] UsernameError),
    #[error("master token must be a non-empty string")]
    EmptyMasterToken,
    #[error("invalid username or master token")]
    InvalidCredentials,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Session(#[from] SessionTokenError),
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        match self {
            LoginError::InvalidUsername(_) | LoginError::EmptyMasterToken => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": self.to_string()})),
            )
                .into_response(),
            LoginError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "invalid username or master token"})),
            )
                .into_response(),
            LoginError::Database(e) => {
                tracing::error!("LOGIN: store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "internal server error"})),
                )
                    .into_response()
            }
            LoginError::Session(e) => {
                tracing::error!("LOGIN: session minting failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "internal server error"})),
                )
                    .into_response()
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for LoginRequest {
    type Response = LoginResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/auth/login").unwrap();
        client.post(full_url).json(&self)
    }
}
