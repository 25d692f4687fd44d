use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::auth::Principal;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAccountRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAccountResponse {}

pub async fn handler(
    State(state): State<ServiceState>,
    principal: Principal,
) -> Result<impl IntoResponse, DeleteAccountError> {
    let username = principal.username();

    // Settings go with the account via the cascade; irreversible.
    let deleted = state.database().delete_account(username).await?;
    if !deleted {
        return Err(DeleteAccountError::NotFound);
    }

    tracing::info!(username = %username, "DELETE ACCOUNT: account removed");
    Ok((StatusCode::OK, Json(DeleteAccountResponse {})).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteAccountError {
    #[error("account not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for DeleteAccountError {
    fn into_response(self) -> Response {
        match self {
            DeleteAccountError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "account not found"})),
            )
                .into_response(),
            DeleteAccountError::Database(e) => {
                tracing::error!("DELETE ACCOUNT: store failure: {}", e);
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
impl ApiRequest for DeleteAccountRequest {
    type Response = DeleteAccountResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/vault").unwrap();
        client.delete(full_url)
    }
}
