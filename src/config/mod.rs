//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `BLAST_RADIUS_*` environment variables; the
//! default tracker credentials come from `JIRA_URL`, `JIRA_EMAIL` and `JIRA_API_TOKEN`.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_CODE_MODEL, DEFAULT_MAX_ITEMS, DEFAULT_RELEVANCE_THRESHOLD, DEFAULT_SYNTHESIS_MODEL,
};
use crate::ranking::{NormalizationPolicy, RankerConfig};

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// MiniLM model directory. `None` runs the stub embedder.
    pub model_path: Option<PathBuf>,

    /// Minimum similarity for an issue to count as relevant. Default: `0.5`.
    pub threshold: f32,

    /// Embedding normalization before scoring. Default: `l2`.
    pub normalization: NormalizationPolicy,

    /// Result cap when a request does not set one. Default: `20`.
    pub max_items: usize,

    /// JSON file of per-tenant settings.
    pub tenant_settings_path: Option<PathBuf>,

    /// LLM used for code diff summaries.
    pub code_model: String,

    /// LLM used for requirements summaries and comparisons.
    pub synthesis_model: String,

    /// Answer LLM requests with the offline stub generator.
    pub mock_provider: bool,

    pub jira_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_api_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            model_path: None,
            threshold: DEFAULT_RELEVANCE_THRESHOLD,
            normalization: NormalizationPolicy::default(),
            max_items: DEFAULT_MAX_ITEMS,
            tenant_settings_path: None,
            code_model: DEFAULT_CODE_MODEL.to_string(),
            synthesis_model: DEFAULT_SYNTHESIS_MODEL.to_string(),
            mock_provider: false,
            jira_url: None,
            jira_email: None,
            jira_api_token: None,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "BLAST_RADIUS_PORT";
    const ENV_BIND_ADDR: &'static str = "BLAST_RADIUS_BIND_ADDR";
    const ENV_MODEL_PATH: &'static str = "BLAST_RADIUS_MODEL_PATH";
    const ENV_THRESHOLD: &'static str = "BLAST_RADIUS_THRESHOLD";
    const ENV_NORMALIZATION: &'static str = "BLAST_RADIUS_NORMALIZATION";
    const ENV_MAX_ITEMS: &'static str = "BLAST_RADIUS_MAX_ITEMS";
    const ENV_TENANT_SETTINGS_PATH: &'static str = "BLAST_RADIUS_TENANT_SETTINGS_PATH";
    const ENV_CODE_MODEL: &'static str = "BLAST_RADIUS_CODE_MODEL";
    const ENV_SYNTHESIS_MODEL: &'static str = "BLAST_RADIUS_SYNTHESIS_MODEL";
    const ENV_MOCK_PROVIDER: &'static str = "BLAST_RADIUS_MOCK_PROVIDER";
    const ENV_JIRA_URL: &'static str = "JIRA_URL";
    const ENV_JIRA_EMAIL: &'static str = "JIRA_EMAIL";
    const ENV_JIRA_API_TOKEN: &'static str = "JIRA_API_TOKEN";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            port: Self::parse_port_from_env(defaults.port)?,
            bind_addr: Self::parse_bind_addr_from_env(defaults.bind_addr)?,
            model_path: Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH),
            threshold: Self::parse_threshold_from_env(defaults.threshold)?,
            normalization: Self::parse_normalization_from_env(defaults.normalization)?,
            max_items: Self::parse_max_items_from_env(defaults.max_items)?,
            tenant_settings_path: Self::parse_optional_path_from_env(
                Self::ENV_TENANT_SETTINGS_PATH,
            ),
            code_model: Self::parse_string_from_env(Self::ENV_CODE_MODEL, defaults.code_model),
            synthesis_model: Self::parse_string_from_env(
                Self::ENV_SYNTHESIS_MODEL,
                defaults.synthesis_model,
            ),
            mock_provider: Self::parse_optional_string_from_env(Self::ENV_MOCK_PROVIDER).is_some(),
            jira_url: Self::parse_optional_string_from_env(Self::ENV_JIRA_URL),
            jira_email: Self::parse_optional_string_from_env(Self::ENV_JIRA_EMAIL),
            jira_api_token: Self::parse_optional_string_from_env(Self::ENV_JIRA_API_TOKEN),
        })
    }

    /// Validates paths and ranking parameters (does not load anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || !(-1.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold.to_string(),
            });
        }

        if self.max_items == 0 {
            return Err(ConfigError::InvalidMaxItems {
                value: self.max_items.to_string(),
            });
        }

        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if let Some(ref path) = self.tenant_settings_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Ranking defaults for requests that do not override them.
    pub fn ranker_config(&self) -> RankerConfig {
        RankerConfig::default()
            .with_threshold(self.threshold)
            .with_max_results(self.max_items)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_threshold_from_env(default: f32) -> Result<f32, ConfigError> {
        match Self::parse_optional_string_from_env(Self::ENV_THRESHOLD) {
            Some(value) => match value.parse::<f32>() {
                Ok(threshold) if threshold.is_finite() => Ok(threshold),
                _ => Err(ConfigError::InvalidThreshold { value }),
            },
            None => Ok(default),
        }
    }

    fn parse_normalization_from_env(
        default: NormalizationPolicy,
    ) -> Result<NormalizationPolicy, ConfigError> {
        match Self::parse_optional_string_from_env(Self::ENV_NORMALIZATION) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidNormalization { value }),
            None => Ok(default),
        }
    }

    fn parse_max_items_from_env(default: usize) -> Result<usize, ConfigError> {
        match Self::parse_optional_string_from_env(Self::ENV_MAX_ITEMS) {
            Some(value) => match value.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ConfigError::InvalidMaxItems { value }),
            },
            None => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
