//! Command-line interface parsing for the profile fetcher
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the list of profiles to process plus output settings.

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::ui::OutputFormat;

/// Profiles processed when none are given on the command line
pub const DEFAULT_PROFILE_URLS: &[&str] = &["https://www.linkedin.com/in/taisdeverdade/"];

/// Store file name, relative to the working directory
pub const DEFAULT_CACHE_FILE: &str = "linkedin_cache.json";

/// Fetch public LinkedIn profiles through Proxycurl, with a local cache
#[derive(Parser, Debug)]
#[command(name = "profile-fetch")]
#[command(about = "Fetch and display LinkedIn profiles via Proxycurl, caching every result locally")]
#[command(version)]
pub struct Cli {
    /// Profile URLs to fetch, in order
    ///
    /// When omitted, the built-in profile list is used. URLs are used as
    /// given: a trailing slash or different casing is a different cache entry.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Profile cache file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CACHE_FILE)]
    pub cache_file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable colors even when writing to a terminal
    #[arg(long)]
    pub no_color: bool,
}

/// Settings derived from CLI arguments for a run
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Identifiers to fetch, in order
    pub profile_urls: Vec<String>,
    /// Store file location
    pub cache_path: PathBuf,
    /// Output format
    pub format: OutputFormat,
    /// Whether colors may be used
    pub color: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    /// * `cwd` - Directory a relative cache path is resolved against, if known
    pub fn from_cli(cli: &Cli, cwd: Option<&Path>) -> Self {
        let profile_urls = if cli.urls.is_empty() {
            DEFAULT_PROFILE_URLS.iter().map(|u| u.to_string()).collect()
        } else {
            cli.urls.clone()
        };

        let cache_path = match cwd {
            Some(dir) if cli.cache_file.is_relative() => dir.join(&cli.cache_file),
            _ => cli.cache_file.clone(),
        };

        StartupConfig {
            profile_urls,
            cache_path,
            format: cli.format,
            color: !cli.no_color,
        }
    }
}
