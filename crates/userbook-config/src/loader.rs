//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use userbook_core::{PageRequest, UserbookError};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "USERBOOK";

/// Loads [`AppConfig`] from a configuration directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader reading TOML files from `config_dir`.
    ///
    /// Sources are applied in order, later ones winning:
    /// 1. `{config_dir}/default.toml`
    /// 2. `{config_dir}/{environment}.toml`
    /// 3. `{config_dir}/local.toml` (not committed to version control)
    /// 4. Environment variables with the `USERBOOK_` prefix and `__` separator,
    ///    e.g. `USERBOOK_DATABASE__URL`
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            environment: None,
        }
    }

    /// Creates a loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Pins the environment instead of reading `USERBOOK_ENVIRONMENT`.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> Result<AppConfig, UserbookError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = self.environment.clone().unwrap_or_else(|| {
            std::env::var(format!("{}_ENVIRONMENT", ENV_PREFIX))
                .unwrap_or_else(|_| "development".to_string())
        });

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder()
            .set_default("app.environment", environment.as_str())
            .map_err(config_error_to_userbook_error)?;

        for name in ["default", environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{}.toml", name));
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path.as_path()).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_userbook_error)?;

        validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Returns the configuration directory.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Validates settings that would otherwise fail later at runtime.
pub fn validate_config(config: &AppConfig) -> Result<(), UserbookError> {
    if config.database.url.trim().is_empty() {
        return Err(UserbookError::Configuration(
            "Database URL is required".to_string(),
        ));
    }

    let url = url::Url::parse(&config.database.url)
        .map_err(|e| UserbookError::Configuration(format!("Invalid database URL: {}", e)))?;
    if url.scheme() != "mysql" {
        return Err(UserbookError::Configuration(format!(
            "Unsupported database scheme: {}",
            url.scheme()
        )));
    }

    if config.database.max_connections == 0
        || config.database.min_connections > config.database.max_connections
    {
        return Err(UserbookError::Configuration(
            "Database pool sizes must satisfy 0 <= min <= max and max > 0".to_string(),
        ));
    }

    let pagination = &config.pagination;
    if pagination.per_page_max == 0 || pagination.per_page_max > PageRequest::MAX_PER_PAGE {
        return Err(UserbookError::Configuration(format!(
            "pagination.per_page_max must be between 1 and {}",
            PageRequest::MAX_PER_PAGE
        )));
    }
    if pagination.per_page_default == 0 || pagination.per_page_default > pagination.per_page_max {
        return Err(UserbookError::Configuration(
            "pagination.per_page_default must be between 1 and pagination.per_page_max".to_string(),
        ));
    }

    if config.app.environment == "production" && config.server.cors_origins.iter().any(|o| o == "*") {
        warn!("CORS allows any origin in production");
    }

    Ok(())
}

fn config_error_to_userbook_error(err: ConfigError) -> UserbookError {
    UserbookError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogFormat, ServerConfig};
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.pagination.per_page_default, 10);
        assert_eq!(config.pagination.per_page_max, 100);
        assert!(config.database.run_migrations);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_server_address() {
        assert_eq!(ServerConfig::default().addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_files_are_layered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 9000\n\n[pagination]\nper_page_default = 20\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            "[server]\nport = 9100\n\n[observability]\nlog_format = \"json\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new(dir.path())
            .with_environment("staging")
            .load()
            .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.pagination.per_page_default, 20);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.app.environment, "staging");
        // Untouched sections keep their defaults.
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_missing_directory_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::new(dir.path().join("absent"))
            .with_environment("test")
            .load()
            .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_rejects_empty_database_url() {
        let mut config = AppConfig::default();
        config.database.url = String::new();
        assert!(matches!(validate_config(&config), Err(UserbookError::Configuration(_))));
    }

    #[test]
    fn test_rejects_non_mysql_url() {
        let mut config = AppConfig::default();
        config.database.url = "postgres://localhost/userbook".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_inconsistent_pagination() {
        let mut config = AppConfig::default();
        config.pagination.per_page_default = 50;
        config.pagination.per_page_max = 20;
        assert!(validate_config(&config).is_err());

        config.pagination.per_page_default = 10;
        config.pagination.per_page_max = 500;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[server]\nport = \"not a port\"\n").unwrap();
        let err = ConfigLoader::new(dir.path())
            .with_environment("test")
            .load()
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }
}
