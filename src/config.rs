use crate::errors::ApiError;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_PATH: &str = "db/apikeys.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_KEY_PREFIX: &str = "Hikmatyar";
pub const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub key_prefix: String,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let bind_addr = get("BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .map_err(|e| ApiError::Configuration(format!("BIND_ADDR: {e}")))?;

        let key_prefix = get("API_KEY_PREFIX", DEFAULT_KEY_PREFIX);
        if key_prefix.is_empty() || key_prefix.contains('-') {
            return Err(ApiError::Configuration(
                "API_KEY_PREFIX must be non-empty and must not contain '-'".to_string(),
            ));
        }

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|e| ApiError::Configuration(format!("BCRYPT_COST: {e}")))?,
            None => DEFAULT_BCRYPT_COST,
        };
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ApiError::Configuration(format!(
                "BCRYPT_COST must be between 4 and 31, got {bcrypt_cost}"
            )));
        }

        Ok(Config {
            database_path: get("DATABASE_PATH", DEFAULT_DATABASE_PATH),
            bind_addr,
            static_dir: PathBuf::from(get("STATIC_DIR", DEFAULT_STATIC_DIR)),
            key_prefix,
            bcrypt_cost,
        })
    }
}
