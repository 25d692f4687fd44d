use axum::Router;

pub mod auth;
pub mod settings;
pub mod vault;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/auth", auth::router(state.clone()))
        .nest("/vault", vault::router(state.clone()))
        .nest("/settings", settings::router(state.clone()))
        .with_state(state)
}
