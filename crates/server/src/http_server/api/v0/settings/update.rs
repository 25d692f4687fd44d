use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::auth::Principal;
use crate::database::SettingsRecord;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub settings: SettingsRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {}

pub async fn handler(
    State(state): State<ServiceState>,
    principal: Principal,
    Json(req): Json<UpdateRequest>,
) -> Result<impl IntoResponse, UpdateError> {
    let username = principal.username();

    if req.settings.auto_lock_time_interval < 0 {
        return Err(UpdateError::InvalidInterval);
    }

    let updated = state
        .database()
        .put_settings(username, &req.settings)
        .await?;
    if !updated {
        return Err(UpdateError::NotFound);
    }

    tracing::debug!(username = %username, "UPDATE SETTINGS: settings saved");
    Ok((StatusCode::OK, Json(UpdateResponse {})).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("auto lock time interval must be a non-negative integer")]
    InvalidInterval,
    #[error("settings not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for UpdateError {
    fn into_response(self) -> Response {
        match self {
            UpdateError::InvalidInterval => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": self.to_string()})),
            )
                .into_response(),
            UpdateError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "settings not found"})),
            )
                .into_response(),
            UpdateError::Database(e) => {
                tracing::error!("UPDATE SETTINGS: store failure: {}", e);
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
        let full_url = base_url.join("/api/v0/settings").unwrap();
        client.put(full_url).json(&self)
    }
}
