//! Environment configuration for the capture server.

use std::num::ParseIntError;

use curlify_core::{CurlOption, CurlOptions};

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("unknown curl option {0:?} in CURLIFY_OPTIONS")]
    UnknownOption(String),

    #[error("invalid CURLIFY_TLS {0:?}: expected 1, 0, true or false")]
    InvalidTls(String),
}

/// Server settings.
///
/// - `PORT`: listen port on 127.0.0.1 (default 3000).
/// - `CURLIFY_OPTIONS`: comma-separated option names, e.g.
///   `compressed,decompress-gzip`.
/// - `CURLIFY_TLS`: mark captured requests as TLS-terminated so generated
///   URLs use `https`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub options: CurlOptions,
    pub tls: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            options: CurlOptions::default(),
            tls: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("PORT") {
            config.port = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?;
        }

        if let Some(value) = lookup("CURLIFY_OPTIONS") {
            config.options = parse_options(&value)?;
        }

        if let Some(value) = lookup("CURLIFY_TLS") {
            config.tls = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => true,
                "0" | "false" | "" => false,
                _ => return Err(ConfigError::InvalidTls(value)),
            };
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }
}

fn parse_options(value: &str) -> Result<CurlOptions, ConfigError> {
    let options = value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| CurlOption::from_name(name).ok_or_else(|| ConfigError::UnknownOption(name.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CurlOptions::from_options(&options))
}
