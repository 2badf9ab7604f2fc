//! Cache-backed profile fetching
//!
//! The fetcher is the only place that decides whether a profile comes from
//! the local store or from the provider. Stored profiles are served forever:
//! there is no freshness check, since every provider call is billed and a
//! profile is treated as a point-in-time snapshot.

use thiserror::Error;

use crate::cache::{CacheStore, CacheStoreError};
use crate::config::Config;
use crate::data::{Profile, ProviderError, ProxycurlClient};

/// Namespace prefix for profile keys in the store
pub const CACHE_KEY_PREFIX: &str = "data:";

/// Errors that abort the fetch of a single profile
#[derive(Debug, Error)]
pub enum FetchError {
    /// The profile store could not be opened, read or written
    #[error(transparent)]
    Cache(#[from] CacheStoreError),

    /// The provider request failed or returned an error status
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Derives the store key for a profile identifier
///
/// The identifier is used verbatim, so URLs that differ only by a trailing
/// slash or letter case are separate entries.
pub fn cache_key(identifier: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, identifier)
}

/// Fetches profiles through the local store
#[derive(Debug, Clone)]
pub struct ProfileFetcher {
    client: ProxycurlClient,
    store: CacheStore,
}

impl ProfileFetcher {
    /// Creates a fetcher from the startup configuration
    pub fn new(config: &Config) -> Self {
        Self {
            client: ProxycurlClient::new(config.api_url.clone(), config.api_key.clone()),
            store: CacheStore::new(config.cache_path.clone()),
        }
    }

    /// Returns the backing store
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Returns the profile for `identifier`
    ///
    /// # Behavior
    /// - Serves the stored profile if one exists, without contacting the provider
    /// - Otherwise issues one provider request, normalizes the payload, stores
    ///   the result and returns it
    /// - Any store or provider failure aborts this identifier; nothing is
    ///   written for it
    ///
    /// The store session stays open until the profile has been written.
    pub async fn fetch(&self, identifier: &str) -> Result<Profile, FetchError> {
        let key = cache_key(identifier);
        let mut session = self.store.open()?;

        if let Some(entry) = session.entry(&key) {
            tracing::info!(
                identifier,
                stored_at = %entry.stored_at,
                "serving cached profile"
            );
            return Ok(entry.profile.clone());
        }

        tracing::info!(
            identifier,
            endpoint = self.client.base_url(),
            "requesting profile from provider"
        );
        let raw = self.client.fetch_profile(identifier).await?;
        let profile = Profile::from_raw(raw);

        session.put(&key, profile.clone())?;
        Ok(profile)
    }
}
