//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => write!(f, "Invalid value for {}: '{}'", var, value),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AppConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

impl AppConfig {
    /// Overlay values taken from the environment.
    ///
    /// `lookup` abstracts `std::env::var` so tests can feed a fixed map.
    /// An empty `FF_SDK_KEY` is treated as unset.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("FF_SDK_KEY") {
            self.flags.sdk_key = if key.trim().is_empty() { None } else { Some(key) };
        }
        if let Some(name) = lookup("FF_FLAG_NAME") {
            self.flags.flag_name = name;
        }
        if let Some(host) = lookup("REDIS_HOST") {
            self.store.host = host;
        }
        if let Some(port) = lookup("REDIS_PORT") {
            self.store.port = parse_env("REDIS_PORT", port)?;
        }
        if let Some(db) = lookup("REDIS_DB") {
            self.store.db = parse_env("REDIS_DB", db)?;
        }
        if let Some(password) = lookup("REDIS_PASSWORD") {
            self.store.password = Some(password);
        }
        if let Some(addr) = lookup("BIND_ADDRESS") {
            self.listener.bind_address = addr;
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            bind_address = "127.0.0.1:5050"

            [store]
            host = "redis.internal"
            max_attempts = 3
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:5050");
        assert_eq!(config.store.host, "redis.internal");
        assert_eq!(config.store.max_attempts, 3);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store]\nmax_attempts = 0").unwrap();

        match load_config(file.path()) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors[0].field, "store.max_attempts"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(env(&[
                ("FF_SDK_KEY", "abc-123"),
                ("FF_FLAG_NAME", "mi_flag"),
                ("REDIS_HOST", "cache"),
                ("REDIS_PORT", "6380"),
                ("REDIS_DB", "3"),
            ]))
            .unwrap();

        assert_eq!(config.flags.sdk_key.as_deref(), Some("abc-123"));
        assert_eq!(config.flags.flag_name, "mi_flag");
        assert_eq!(config.store.url(), "redis://cache:6380/3");
    }

    #[test]
    fn test_empty_sdk_key_disables_flags() {
        let mut config = AppConfig::default();
        config.flags.sdk_key = Some("from-file".into());
        config.apply_env_overrides(env(&[("FF_SDK_KEY", "")])).unwrap();
        assert!(config.flags.sdk_key.is_none());
    }

    #[test]
    fn test_bad_numeric_override() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(env(&[("REDIS_PORT", "seis mil")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for REDIS_PORT: 'seis mil'");
    }
}
