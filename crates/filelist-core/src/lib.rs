//! FileList.io Search Adapter Core Library
//!
//! Async client for searching the filelist.io private tracker:
//! authenticates a cookie session, paginates browse-page results,
//! extracts torrent metadata from the fixed row markup, and delivers
//! each result to a caller-defined sink.
//!
//! # Overview
//!
//! - Session client with bounded retries and a one-way fault latch
//!   ([`FilelistClient`])
//! - Login flow with anti-forgery token extraction ([`auth`])
//! - Pattern-based browse-page parser ([`parser`])
//! - Paginating search API ([`FilelistScraper`])
//!
//! # Example
//!
//! ```no_run
//! use filelist_core::{Credentials, FilelistScraper, VecSink};
//!
//! #[tokio::main]
//! async fn main() -> filelist_core::Result<()> {
//!     let credentials = Credentials {
//!         username: "alice".to_string(),
//!         password: "hunter2".to_string(),
//!     };
//!     let scraper = FilelistScraper::new(credentials)?;
//!     scraper.login().await;
//!
//!     let mut sink = VecSink::new();
//!     scraper.search("mandalorian+s01", "tv", &mut sink).await;
//!
//!     for result in &sink.results {
//!         println!("{} ({} seeders)", result.name, result.seeders);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Fault latch
//!
//! Fatal conditions (bad credentials, blocked client identity, login
//! rejections) latch the client into a permanent fault state. The next
//! `search` or `download_torrent` call emits a single synthetic error
//! entry pointing the operator at the log, clears the latch, and makes
//! no network calls.

pub mod auth;
mod client;
mod error;
pub mod parser;
mod scraper;
mod sink;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, FilelistClient};

// Re-export error types
pub use error::{FilelistError, LoginFailure, Result};

// Re-export parser functions
pub use parser::{parse_result_fragment, split_result_fragments};

// Re-export main scraper API
pub use scraper::FilelistScraper;

// Re-export sink types
pub use sink::{ResultSink, VecSink};

// Re-export data types
pub use types::{Category, Credentials, TorrentResult};
