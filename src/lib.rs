//! Profile Fetch Library
//!
//! Cache-backed fetching of public profiles from Proxycurl, exposed as a
//! library for the binary and for integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod fetcher;
pub mod ui;

pub use cache::{CacheStore, CacheStoreError};
pub use config::{Config, ConfigError};
pub use data::{ExperienceEntry, Profile};
pub use fetcher::{FetchError, ProfileFetcher};
