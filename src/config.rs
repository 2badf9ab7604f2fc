//! Runtime configuration read once at startup
//!
//! The provider credential comes from the process environment and is handed
//! to the fetcher explicitly; nothing else reads the environment.

use std::path::PathBuf;
use thiserror::Error;

use crate::data::proxycurl::PROXYCURL_API_URL;

/// Environment variable holding the Proxycurl bearer token
pub const API_KEY_VAR: &str = "PROXYCURL_API_KEY";

/// Optional environment variable overriding the provider endpoint
pub const API_URL_VAR: &str = "PROXYCURL_API_URL";

/// Errors that stop the program before any profile is fetched
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The credential is missing or empty
    #[error("The API key {0} is not set. Export it as an environment variable.")]
    MissingApiKey(&'static str),
}

/// Settings shared by every fetch in a run
#[derive(Clone)]
pub struct Config {
    /// Bearer token for the provider
    pub api_key: String,
    /// Provider endpoint
    pub api_url: String,
    /// Location of the profile store file
    pub cache_path: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("cache_path", &self.cache_path)
            .finish()
    }
}

impl Config {
    /// Builds the configuration from the process environment
    pub fn from_env(cache_path: PathBuf) -> Result<Self, ConfigError> {
        Self::from_lookup(cache_path, |name| std::env::var(name).ok())
    }

    /// Builds the configuration using `lookup` to resolve variables
    ///
    /// # Returns
    /// * `Ok(Config)` when the API key is present and non-empty
    /// * `Err(ConfigError::MissingApiKey)` otherwise
    pub fn from_lookup<F>(cache_path: PathBuf, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;

        let api_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| PROXYCURL_API_URL.to_string());

        Ok(Self {
            api_key,
            api_url,
            cache_path,
        })
    }
}
