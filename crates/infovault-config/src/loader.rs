//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use infovault_core::InfoError;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable holding the MySQL connection string.
pub const DB_CONN_VAR: &str = "DB_CONN";

/// Configuration loaded once at startup.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `INFOVAULT__` prefix
    /// 5. `DB_CONN` for the database URL
    pub fn new(config_dir: impl Into<String>) -> Result<Self, InfoError> {
        let config_dir: String = config_dir.into();
        let config = Self::load_config(&config_dir)?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, InfoError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, InfoError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("INFOVAULT_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("INFOVAULT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_info_error)?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_info_error)?;

        apply_env_overrides(&mut app_config, |key| std::env::var(key).ok());

        ConfigValidator::validate(&app_config)
            .map_err(|errors| InfoError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }
}

/// Applies the legacy environment overrides that bypass the prefixed scheme.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(DB_CONN_VAR).filter(|u| !u.trim().is_empty()) {
        debug!("Database URL taken from {}", DB_CONN_VAR);
        config.database.url = url;
    }
}

fn config_error_to_info_error(err: ConfigError) -> InfoError {
    InfoError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_db_conn_overrides_database_url() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |key| {
            (key == DB_CONN_VAR).then(|| "mysql://app:secret@db:3306/info".to_string())
        });
        assert_eq!(config.database.url, "mysql://app:secret@db:3306/info");
    }

    #[test]
    fn test_blank_db_conn_is_ignored() {
        let mut config = AppConfig::default();
        let before = config.database.url.clone();
        apply_env_overrides(&mut config, |_| Some("   ".to_string()));
        assert_eq!(config.database.url, before);
    }

    #[test]
    fn test_loads_default_toml() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.toml")).unwrap();
        writeln!(
            file,
            "[server]\nhost = \"127.0.0.1\"\nport = 7000\nrequest_timeout_secs = 10\ncors_enabled = false\ncors_origins = []\ncontent_security_policy = \"default-src 'self'\"\n\n[executor]\nmax_in_flight = 8\nquery_timeout_secs = 5\n"
        )
        .unwrap();

        let loader = ConfigLoader::new(dir.path().to_string_lossy().to_string()).unwrap();
        assert_eq!(loader.get().server.port, 7000);

        let config = loader.into_config();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.executor.max_in_flight, 8);
    }
}
