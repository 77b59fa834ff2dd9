//! Environment-driven configuration for loading specification documents

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domains::DEFAULT_VERSION;

pub const ENV_SPEC_SOURCE: &str = "EDFI_SPEC_SOURCE";
pub const ENV_DATA_STANDARD_VERSION: &str = "EDFI_DATA_STANDARD_VERSION";
pub const ENV_CACHE_DIR: &str = "EDFI_CACHE_DIR";
pub const ENV_CACHE_TTL_SECS: &str = "EDFI_CACHE_TTL_SECS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "EDFI_HTTP_TIMEOUT_SECS";

pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const CACHE_DIR_NAME: &str = "edfi-schema-cache";

/// Where specification documents come from and how they are cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Path or http(s) URL of the OpenAPI document
    pub spec_source: Option<String>,
    /// Taxonomy version used when a caller names none
    pub data_standard_version: String,
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,
    pub http_timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            spec_source: None,
            data_standard_version: DEFAULT_VERSION.to_string(),
            cache_dir: env::temp_dir().join(CACHE_DIR_NAME),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl SourceConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    ///
    /// Empty values count as unset; unparseable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let seconds = |key: &str, default: u64| {
            Duration::from_secs(
                get(key)
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(default),
            )
        };
        let defaults = Self::default();

        Self {
            spec_source: get(ENV_SPEC_SOURCE),
            data_standard_version: get(ENV_DATA_STANDARD_VERSION)
                .unwrap_or(defaults.data_standard_version),
            cache_dir: get(ENV_CACHE_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            cache_ttl: seconds(ENV_CACHE_TTL_SECS, DEFAULT_CACHE_TTL_SECS),
            http_timeout: seconds(ENV_HTTP_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    pub fn with_spec_source(mut self, source: impl Into<String>) -> Self {
        self.spec_source = Some(source.into());
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }
}
