//! Vault blob endpoints, all gated by the verified [`Principal`].
//!
//! [`Principal`]: crate::auth::Principal

use axum::routing::get;
use axum::Router;

use crate::ServiceState;

pub mod delete_account;
pub mod read;
pub mod update;

// Re-export for convenience
pub use update::UpdateRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route(
            "/",
            get(read::handler)
                .put(update::handler)
                .delete(delete_account::handler),
        )
        .with_state(state)
}
