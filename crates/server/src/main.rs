//! vaultkeep - zero-knowledge password vault backend
//!
//! The server never sees a master password: clients send a PBKDF2-derived
//! master token and an opaque encrypted vault blob, and get back a JWT
//! session credential.

use std::path::PathBuf;

use clap::Parser;

use vaultkeep_server::{spawn_service, ServiceConfig};

/// vaultkeep - zero-knowledge password vault backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on for HTTP requests
    #[arg(short, long, default_value = "5001")]
    port: u16,

    /// Path to SQLite database file (in-memory if not set)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Secret used to sign session credentials (generated if not set)
    #[arg(long, env = "VAULTKEEP_SESSION_SECRET", hide_env_values = true)]
    session_secret: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Directory for log files (stdout only if not set)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::INFO);

    let config = ServiceConfig {
        api_port: args.port,
        sqlite_path: args.database,
        session_secret: args.session_secret,
        log_level,
        log_dir: args.log_dir,
    };

    spawn_service(&config).await;
}
