//! API configuration

use core_kernel::CoreError;
use serde::Deserialize;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// PostgreSQL URL; without one the server keeps policies in memory
    #[serde(default)]
    pub database_url: Option<String>,
    /// Load the fixture policies on start
    pub seed_fixtures: bool,
    /// Log level or `EnvFilter` directive
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            seed_fixtures: true,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_`-prefixed environment variables
    ///
    /// Unset variables keep their defaults. `DATABASE_URL` is honoured when
    /// `API_DATABASE_URL` is absent.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let mut loaded: Self = config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("seed_fixtures", defaults.seed_fixtures)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_json", defaults.log_json)?
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if loaded.database_url.is_none() {
            loaded.database_url = std::env::var("DATABASE_URL").ok();
        }
        Ok(loaded)
    }

    /// Rejects settings the server cannot start with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::configuration("host must not be empty"));
        }
        if matches!(&self.database_url, Some(url) if url.trim().is_empty()) {
            return Err(CoreError::configuration(
                "database_url must not be empty when set",
            ));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
