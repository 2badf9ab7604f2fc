//! Profile Fetch CLI - Display LinkedIn profiles fetched through Proxycurl
//!
//! Profiles are processed one after another. Every successful fetch is stored
//! in a local cache file and served from there on later runs, so each profile
//! costs at most one provider request.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use profile_fetch::cli::{Cli, StartupConfig};
use profile_fetch::config::Config;
use profile_fetch::fetcher::ProfileFetcher;
use profile_fetch::ui::Console;

/// Sets up logging to stderr, keeping stdout for the report
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,profile_fetch=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Fetches and prints every profile, returning how many failed
///
/// A failed profile is reported and skipped; only output errors stop the run.
async fn run(
    fetcher: &ProfileFetcher,
    profile_urls: &[String],
    console: &mut Console<io::Stdout>,
) -> io::Result<usize> {
    console.cache_notice(fetcher.store().path())?;

    let mut failures = 0;
    for (i, url) in profile_urls.iter().enumerate() {
        let index = i + 1;
        console.rule(index)?;

        match fetcher.fetch(url).await {
            Ok(profile) => console.profile(&profile, index)?,
            Err(e) => {
                tracing::error!(identifier = %url, error = %e, "failed to fetch profile");
                console.error(index, &e)?;
                failures += 1;
            }
        }
    }

    Ok(failures)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().ok();
    let startup = StartupConfig::from_cli(&cli, cwd.as_deref());

    // Fail before any request when the credential is missing
    let config = match Config::from_env(startup.cache_path.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let fetcher = ProfileFetcher::new(&config);
    let mut console = Console::stdout(startup.format, startup.color);

    match run(&fetcher, &startup.profile_urls, &mut console).await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            tracing::warn!(failures, total = startup.profile_urls.len(), "some profiles failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: failed to write output: {}", e);
            ExitCode::FAILURE
        }
    }
}
