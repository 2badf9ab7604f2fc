//! Proxycurl person profile API client
//!
//! This module fetches raw profile payloads from the Proxycurl LinkedIn
//! endpoint. The payload schema is only partially trusted, so every field is
//! optional here and normalization happens in [`super::Profile::from_raw`].

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Default Proxycurl person profile endpoint
pub const PROXYCURL_API_URL: &str = "https://nubela.co/proxycurl/api/v2/linkedin";

/// Errors that can occur when talking to the provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status
    #[error("Provider returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    /// The response body was not a profile object
    #[error("Failed to parse provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A `{month, year}` pair as returned by the provider
///
/// Values are kept as raw JSON so they can be rendered exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawDate {
    pub month: Option<Value>,
    pub year: Option<Value>,
}

/// A single experience record from the provider
///
/// Text fields are raw JSON as well: a number where a string was expected is
/// rendered, not rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExperience {
    pub company: Option<Value>,
    pub title: Option<Value>,
    pub location: Option<Value>,
    pub starts_at: Option<RawDate>,
    pub ends_at: Option<RawDate>,
}

/// Person profile response from Proxycurl
///
/// Only the fields this tool renders are declared; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProfile {
    pub full_name: Option<Value>,
    pub occupation: Option<Value>,
    pub headline: Option<Value>,
    pub summary: Option<Value>,
    pub city: Option<Value>,
    pub state: Option<Value>,
    pub country_full_name: Option<Value>,
    pub experiences: Option<Vec<RawExperience>>,
}

/// Client for the Proxycurl person profile endpoint
#[derive(Clone)]
pub struct ProxycurlClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for ProxycurlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxycurlClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ProxycurlClient {
    /// Creates a client for the given endpoint and bearer credential
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Returns the endpoint this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the raw profile for a profile URL
    ///
    /// Issues exactly one GET request. Any non-2xx response is returned as
    /// [`ProviderError::Status`] with the response body as detail; there is
    /// no retry.
    pub async fn fetch_profile(&self, profile_url: &str) -> Result<RawProfile, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .bearer_auth(&self.api_key)
            .query(&[("url", profile_url)])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status,
                detail: status_detail(status, &text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Longest error body kept as detail, in characters
const MAX_DETAIL_CHARS: usize = 500;

/// Picks a human-readable detail for an error response
///
/// Error pages can be arbitrarily large, so the body is cut to
/// [`MAX_DETAIL_CHARS`].
fn status_detail(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }

    match body.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}
