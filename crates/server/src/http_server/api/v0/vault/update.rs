use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::auth::Principal;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// Opaque client-encrypted blob; any bytes are legal
    pub vault: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {}

pub async fn handler(
    State(state): State<ServiceState>,
    principal: Principal,
    Json(req): Json<UpdateRequest>,
) -> Result<impl IntoResponse, UpdateError> {
    let username = principal.username();

    // Single-statement overwrite: no window between the existence check and
    // the write.
    let updated = state.database().put_vault(username, &req.vault).await?;
    if !updated {
        return Err(UpdateError::NotFound);
    }

    tracing::debug!(username = %username, "UPDATE VAULT: blob overwritten");
    Ok((StatusCode::OK, Json(UpdateResponse {})).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("vault not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for UpdateError {
    fn into_response(self) -> Response {
        match self {
            UpdateError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "vault not found"})),
            )
                .into_response(),
            UpdateError::Database(e) => {
                tracing::error!("UPDATE VAULT: store failure: {}", e);
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
impl ApiRequest for UpdateRequest {
    type Response = UpdateResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/vault").unwrap();
        client.put(full_url).json(&self)
    }
}
