// Service modules
pub mod auth;
pub mod database;
pub mod http_server;
pub mod process;
pub mod service_config;

// Service state (database pool, session keys)
pub mod state;

// Re-exports for consumers (CLI, integration tests)
pub use database::Database;
pub use process::{spawn_service, start_service, ShutdownHandle};
pub use service_config::Config as ServiceConfig;
pub use state::State as ServiceState;
