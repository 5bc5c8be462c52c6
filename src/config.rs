use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Startup configuration, built once and passed to whoever needs it
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the monitoring backend, without trailing slash
    pub api_base: String,
    /// Maximum number of entries kept in the live transaction list
    pub live_capacity: usize,
}

impl Config {
    pub const API_URL_VAR: &'static str = "JAGA_DANA_API_URL";
    pub const LIVE_CAPACITY_VAR: &'static str = "JAGA_DANA_LIVE_CAPACITY";
    pub const DEFAULT_API_URL: &'static str = "http://188.166.197.4:8088";
    pub const DEFAULT_LIVE_CAPACITY: usize = 50;

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = match lookup(Self::API_URL_VAR) {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => Self::DEFAULT_API_URL.to_string(),
        };

        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                name: Self::API_URL_VAR,
                reason: format!("'{}' is not an http(s) URL", api_base),
            });
        }

        let live_capacity = match lookup(Self::LIVE_CAPACITY_VAR) {
            Some(raw) => {
                let capacity = raw.trim().parse::<usize>().map_err(|e| ConfigError::InvalidValue {
                    name: Self::LIVE_CAPACITY_VAR,
                    reason: e.to_string(),
                })?;
                if capacity == 0 {
                    return Err(ConfigError::InvalidValue {
                        name: Self::LIVE_CAPACITY_VAR,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                capacity
            }
            None => Self::DEFAULT_LIVE_CAPACITY,
        };

        Ok(Self {
            api_base,
            live_capacity,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: Self::DEFAULT_API_URL.to_string(),
            live_capacity: Self::DEFAULT_LIVE_CAPACITY,
        }
    }
}
