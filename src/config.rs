use crate::errors::ConfigError;
use crate::registry::CategoryRegistry;
use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub registry_path: Option<PathBuf>,
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            data_path: resolve_data_path(),
            registry_path: env::var("APP_REGISTRY_PATH").ok().map(PathBuf::from),
            log_level: env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The configured registry file, or the built-in one.
    pub fn load_registry(&self) -> Result<CategoryRegistry, ConfigError> {
        let Some(path) = &self.registry_path else {
            return Ok(CategoryRegistry::standard());
        };
        let bytes = std::fs::read(path).map_err(|source| ConfigError::RegistryFile {
            path: path.display().to_string(),
            source,
        })?;
        CategoryRegistry::from_json(&bytes)
    }
}

pub fn resolve_data_path() -> PathBuf {
    match env::var("APP_DATA_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => PathBuf::from(DEFAULT_DATA_PATH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_registry_path_uses_standard_registry() {
        let config = AppConfig {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            registry_path: None,
            log_level: "info".to_string(),
        };
        assert_eq!(config.load_registry().unwrap(), CategoryRegistry::standard());
    }

    #[test]
    fn unreadable_registry_file_is_a_config_error() {
        let config = AppConfig {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            registry_path: Some(PathBuf::from("/nonexistent/registry.json")),
            log_level: "info".to_string(),
        };
        assert!(matches!(
            config.load_registry(),
            Err(ConfigError::RegistryFile { .. })
        ));
    }
}
