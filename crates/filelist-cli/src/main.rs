//! qBittorrent-style host adapter for the filelist.io search engine.
//!
//! Exposes the two host operations as subcommands. Results go to
//! stdout as pipe-delimited lines; diagnostics go to a log file
//! beside the executable, overwritten on each run.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use filelist_core::{Credentials, FilelistScraper};
use tracing_subscriber::EnvFilter;

mod output;

use output::StdoutSink;

const LOG_FILE: &str = "filelist.log";
const CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Parser)]
#[command(name = "filelist-search", about = "Search adapter for filelist.io")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the tracker and print one line per result
    Search {
        /// Host-escaped search tokens, e.g. "mandalorian+s01"
        what: String,
        /// Category name; unknown names fall back to "all"
        #[arg(default_value = "all")]
        category: String,
    },
    /// Download a .torrent file and print "<local_path> <original_url>"
    Download {
        /// Download URL as previously printed by a search
        url: String,
    },
}

/// Directory of the running executable; credentials and the log file
/// live beside it.
fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Route tracing output to the fixed-path log file, truncated each
/// run. Stdout stays reserved for the host protocol.
fn init_logging() {
    let path = exe_dir().join(LOG_FILE);
    let Ok(file) = std::fs::File::create(&path) else {
        // No log file, no logging; the host protocol must stay clean.
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let credentials = Credentials::load(&exe_dir().join(CREDENTIALS_FILE));
    let scraper = match FilelistScraper::new(credentials) {
        Ok(scraper) => scraper,
        Err(e) => {
            tracing::error!("failed to build HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Login failure latches the client; the operation below then
    // reports it as a synthetic result entry instead of aborting.
    scraper.login().await;

    let mut sink = StdoutSink;
    match cli.command {
        Command::Search { what, category } => {
            scraper.search(&what, &category, &mut sink).await;
        }
        Command::Download { url } => {
            if let Some((path, origin)) = scraper.download_torrent(&url, &mut sink).await {
                println!("{} {}", path.display(), origin);
            }
        }
    }

    ExitCode::SUCCESS
}
