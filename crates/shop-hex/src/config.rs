use anyhow::Context;
use serde::Deserialize;
use std::env;

pub const DEFAULT_SETTLEMENT_DELAY_SECS: u64 = 5;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: String,
    pub database_url: Option<String>,
    /// Base URL the payment service reaches the catalog at.
    pub catalog_base_url: String,
    /// Simulated payment settlement latency before an order completes.
    pub settlement_delay_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "3000".into());
        let database_url = env::var("DATABASE_URL").ok();
        let catalog_base_url =
            env::var("CATALOG_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".into());
        let settlement_delay_secs = match env::var("SETTLEMENT_DELAY_SECS") {
            Ok(raw) => raw
                .parse()
                .context("SETTLEMENT_DELAY_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_SETTLEMENT_DELAY_SECS,
        };
        Ok(Self {
            server_port,
            database_url,
            catalog_base_url,
            settlement_delay_secs,
        })
    }
}
