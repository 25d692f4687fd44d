use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // log level for http tracing
    pub log_level: tracing::Level,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, log_level: tracing::Level) -> Self {
        Self {
            listen_addr,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_carries_log_level() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let config = Config::new(addr, tracing::Level::DEBUG);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.listen_addr, addr);
    }
}
