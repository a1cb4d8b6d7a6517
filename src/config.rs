use secrecy::Secret;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Where users and expenses are kept
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Postgres { database_url: Secret<String> },
    /// Volatile; selected only with `STORE=memory`
    Memory,
}

/// Startup configuration read from the environment
#[derive(Debug, Clone)]
pub struct Settings {
    pub jwt_secret: Secret<String>,
    pub store: StoreBackend,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub rate_limit_seconds_per_request: u64,
    pub rate_limit_burst: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has invalid value '{}'", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let store = match get("STORE").as_deref().map(str::trim) {
            None | Some("postgres") => StoreBackend::Postgres {
                database_url: get("DATABASE_URL")
                    .map(Secret::new)
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORE",
                    value: other.to_string(),
                })
            }
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            jwt_secret: Secret::new(jwt_secret),
            store,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("PORT"), "PORT", 4000)?,
            cors_allowed_origins,
            rate_limit_seconds_per_request: parse_or(
                get("RATE_LIMIT_SECONDS_PER_REQUEST"),
                "RATE_LIMIT_SECONDS_PER_REQUEST",
                1,
            )?,
            rate_limit_burst: parse_or(get("RATE_LIMIT_BURST"), "RATE_LIMIT_BURST", 30)?,
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
