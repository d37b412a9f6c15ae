use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// JSON data file; the in-memory store is used when unset.
    pub data_file: Option<String>,
    pub log_level: String,
    pub snapshot_cache_ttl: Duration,
    pub session_code_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            data_file: None,
            log_level: "info".to_string(),
            snapshot_cache_ttl: Duration::from_secs(3600),
            session_code_length: 6,
        }
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            data_file: env::var("DATA_FILE").ok().filter(|v| !v.trim().is_empty()),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            snapshot_cache_ttl: env::var("SNAPSHOT_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.snapshot_cache_ttl),
            session_code_length: env::var("SESSION_CODE_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|len| (4..=32).contains(len))
                .unwrap_or(defaults.session_code_length),
        }
    }
}

// Global static accessible everywhere
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
