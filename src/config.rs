use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub reorder_debounce_ms: u64,
    pub service_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let reorder_debounce_ms = env::var("REORDER_DEBOUNCE_MS")
            .unwrap_or_else(|_| "1500".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidDebounce)?;

        let service_name = env::var("SERVICE_NAME").unwrap_or_else(|_| "rolegraph".to_string());

        Ok(Config {
            reorder_debounce_ms,
            service_name,
        })
    }

    pub fn reorder_debounce(&self) -> Duration {
        Duration::from_millis(self.reorder_debounce_ms)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("REORDER_DEBOUNCE_MS must be an integer number of milliseconds")]
    InvalidDebounce,
}
