use std::path::PathBuf;

#[derive(Debug)]
pub struct Config {
    // http server configuration
    /// Port for the API HTTP server.
    pub api_port: u16,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // session configuration
    /// secret used to sign session credentials, if not set then a
    ///  random one will be generated at startup
    pub session_secret: Option<String>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_port: 5001,
            sqlite_path: None,
            session_secret: None,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
