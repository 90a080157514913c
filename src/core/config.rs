use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON file of `{ trader_id: [order, ...] }` loaded at start-up.
    pub seed_path: Option<PathBuf>,
    /// Register unknown traders on their first order instead of rejecting it.
    pub auto_register_traders: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            server: ServerConfig {
                host: host
                    .parse()
                    .with_context(|| format!("invalid SERVER_HOST: {}", host))?,
                port: lookup("SERVER_PORT")
                    .unwrap_or_else(|| "8080".to_string())
                    .parse()
                    .unwrap_or(8080),
            },
            store: StoreConfig {
                seed_path: lookup("ORDERS_SEED_PATH")
                    .filter(|path| !path.is_empty())
                    .map(PathBuf::from),
                auto_register_traders: lookup("ORDERS_AUTO_REGISTER")
                    .unwrap_or_else(|| "false".to_string())
                    .parse()
                    .unwrap_or(false),
            },
            monitoring: MonitoringConfig {
                log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            },
        })
    }
}
