use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    fn parse(value: &str) -> Self {
        let origins: Vec<String> = value
            .split(',')
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        if origins.iter().any(|origin| origin == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

/// Runtime settings, read from the process environment after `.env` is loaded.
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_name: String,
    pub version: String,
    pub api_v1_str: String,
    pub host: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub db_pool_size: u32,
    pub cors_origins: CorsOrigins,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            project_name: "Sistema Asignación Aulas UNSA".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            api_v1_str: "/api/v1".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            storage_backend: StorageBackend::Postgres,
            database_url: None,
            db_pool_size: 10,
            cors_origins: CorsOrigins::List(vec!["http://localhost:3000".to_string()]),
            log_format: LogFormat::Compact,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "STORAGE_BACKEND",
                value,
            })?,
            None => defaults.storage_backend,
        };

        let database_url = lookup("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let api_v1_str = lookup("API_V1_STR")
            .map(|prefix| format!("/{}", prefix.trim_matches('/')))
            .unwrap_or(defaults.api_v1_str);

        Ok(Settings {
            project_name: lookup("PROJECT_NAME").unwrap_or(defaults.project_name),
            version: defaults.version,
            api_v1_str,
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", lookup("PORT"), defaults.port)?,
            storage_backend,
            database_url,
            db_pool_size: parse_or("DB_POOL_SIZE", lookup("DB_POOL_SIZE"), defaults.db_pool_size)?,
            cors_origins: lookup("BACKEND_CORS_ORIGINS")
                .map(|value| CorsOrigins::parse(&value))
                .unwrap_or(defaults.cors_origins),
            log_format: match lookup("LOG_FORMAT") {
                Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value,
                })?,
                None => defaults.log_format,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
