use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Which store backs the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub sweep_interval_secs: u64,
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            store: StoreBackend::Memory,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database_name: "blog".to_string(),
            jwt_secret: "local-development-secret".to_string(),
            token_ttl_hours: 1,
            sweep_interval_secs: 300,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let or_default = |name: &str, default: String| lookup(name).unwrap_or(default);

        let store = match lookup("STORE").as_deref() {
            None | Some("mongodb") => StoreBackend::Mongo,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            host: or_default("HOST", defaults.host),
            port: parse(&lookup, "PORT", defaults.port)?,
            store,
            mongodb_uri: or_default("MONGODB_URI", defaults.mongodb_uri),
            database_name: or_default("DATABASE_NAME", defaults.database_name),
            jwt_secret: lookup("JWT_SECRET")
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::Missing("JWT_SECRET"))?,
            token_ttl_hours: parse(&lookup, "TOKEN_TTL_HOURS", defaults.token_ttl_hours)?,
            sweep_interval_secs: parse(&lookup, "SWEEP_INTERVAL_SECS", defaults.sweep_interval_secs)?,
            bcrypt_cost: parse(&lookup, "BCRYPT_COST", defaults.bcrypt_cost)?,
        })
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn secret_is_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn defaults_fill_the_rest() {
        let config = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.store, StoreBackend::Mongo);
        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017");
        assert_eq!(config.token_ttl_hours, 1);
    }

    #[test]
    fn rejects_bad_values() {
        let bad_port = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("PORT", "http")]));
        assert!(matches!(bad_port, Err(ConfigError::Invalid { name: "PORT", .. })));

        let bad_store = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("STORE", "redis")]));
        assert!(matches!(bad_store, Err(ConfigError::Invalid { name: "STORE", .. })));
    }

    #[test]
    fn memory_store_can_be_selected() {
        let config =
            AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("STORE", "memory")])).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
    }
}
