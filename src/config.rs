use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres when set, in-memory store otherwise.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub forward_timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let db_max_connections: u32 = env_or("HOOKRELAY_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid HOOKRELAY_DB_MAX_CONNECTIONS: {e}"))?;

        let host: IpAddr = env_or("HOOKRELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid HOOKRELAY_HOST: {e}"))?;

        let port: u16 = env_or("HOOKRELAY_PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid HOOKRELAY_PORT: {e}"))?;

        let max_body_size: usize = env_or("HOOKRELAY_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid HOOKRELAY_MAX_BODY_SIZE: {e}"))?;

        let forward_timeout_secs: u64 = env_or("HOOKRELAY_FORWARD_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid HOOKRELAY_FORWARD_TIMEOUT_SECS: {e}"))?;
        if forward_timeout_secs == 0 {
            return Err("Invalid HOOKRELAY_FORWARD_TIMEOUT_SECS: must be greater than zero".to_string());
        }

        let log_level = env_or("HOOKRELAY_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            db_max_connections,
            host,
            port,
            max_body_size,
            forward_timeout: Duration::from_secs(forward_timeout_secs),
            log_level,
        })
    }
}
