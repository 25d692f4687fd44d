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
pub struct ReadRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResponse {
    pub settings: SettingsRecord,
}

pub async fn handler(
    State(state): State<ServiceState>,
    principal: Principal,
) -> Result<impl IntoResponse, ReadError> {
    let username = principal.username();

    let settings = state
        .database()
        .settings(username)
        .await?
        .ok_or(ReadError::NotFound)?;

    Ok((StatusCode::OK, Json(ReadResponse { settings })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("settings not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ReadError {
    fn into_response(self) -> Response {
        match self {
            ReadError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "settings not found"})),
            )
                .into_response(),
            ReadError::Database(e) => {
                tracing::error!("READ SETTINGS: store failure: {}", e);
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
impl ApiRequest for ReadRequest {
    type Response = ReadResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/settings").unwrap();
        client.get(full_url)
    }
}
