//! Cache module for storing normalized profiles on disk
//!
//! This module provides a file-backed store that keeps every fetched profile
//! permanently under a string key. Entries are never expired or evicted by
//! this tool; the file has to be removed by hand to force a refetch.

mod store;

pub use store::{CacheEntry, CacheSession, CacheStore, CacheStoreError, STORE_VERSION};
