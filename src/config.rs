// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Signing key used when `SESSION_SECRET` is not set. Only fit for local development.
pub const DEV_SESSION_SECRET: &str = "dev-secret-key-change-me";

/// Name of the cookie that carries the signed session token.
pub const SESSION_COOKIE: &str = "quiz_session";

/// Default session lifetime: one day.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub questions_csv: PathBuf,
    pub session_secret: String,
    pub session_ttl_secs: u64,
    pub bind_addr: SocketAddr,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
    pub log_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    /// Every variable has a default; only malformed values are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let questions_csv = env::var("QUESTIONS_CSV")
            .unwrap_or_else(|_| "questions.csv".to_string())
            .into();

        let session_secret =
            env::var("SESSION_SECRET").unwrap_or_else(|_| DEV_SESSION_SECRET.to_string());

        let session_ttl_secs = match env::var("SESSION_TTL_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or(ConfigError::Invalid {
                    key: "SESSION_TTL_SECS",
                    value,
                })?,
            Err(_) => DEFAULT_SESSION_TTL_SECS,
        };

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(value) => value.parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
                key: "BIND_ADDR",
                value,
            })?,
            Err(_) => SocketAddr::from(([127, 0, 0, 1], 5000)),
        };

        let templates_dir = env::var("TEMPLATES_DIR")
            .unwrap_or_else(|_| "templates".to_string())
            .into();

        let static_dir = env::var("STATIC_DIR")
            .unwrap_or_else(|_| "static".to_string())
            .into();

        let log_dir = env::var("LOG_DIR")
            .unwrap_or_else(|_| "logs".to_string())
            .into();

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            questions_csv,
            session_secret,
            session_ttl_secs,
            bind_addr,
            templates_dir,
            static_dir,
            log_dir,
            rust_log,
        })
    }

    /// True when the built-in development signing key is in use.
    pub fn uses_dev_secret(&self) -> bool {
        self.session_secret == DEV_SESSION_SECRET
    }
}
