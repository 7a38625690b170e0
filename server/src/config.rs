use std::env;
use std::net::SocketAddr;

use anyhow::Context;

/// Relay settings, read from the environment (a `.env` file is honored).
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Seconds between keepalive pings.
    pub ping_interval_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1".to_string(), port: 8000, ping_interval_secs: 10 }
    }
}

impl RelayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut cfg = Self::default();
        if let Ok(addr) = env::var("BIND_ADDR") {
            cfg.bind_addr = addr;
        }
        if let Ok(port) = env::var("PORT") {
            cfg.port = port.parse().with_context(|| format!("parse PORT={port}"))?;
        }
        if let Ok(secs) = env::var("PING_INTERVAL_SECS") {
            cfg.ping_interval_secs = secs.parse().with_context(|| format!("parse PING_INTERVAL_SECS={secs}"))?;
        }
        Ok(cfg)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .with_context(|| format!("parse listen address {}:{}", self.bind_addr, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_addr_matches_client_default() {
        let addr = RelayConfig::default().socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8000");
    }

    #[test]
    fn bad_bind_addr_is_an_error() {
        let cfg = RelayConfig { bind_addr: "not an ip".into(), ..RelayConfig::default() };
        assert!(cfg.socket_addr().is_err());
    }
}
