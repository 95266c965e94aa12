//! High-level search API for filelist.io.
//!
//! Combines the session client, the login flow, and the browse-page
//! parser into the two operations the host invokes: `search` and
//! `download_torrent`. Results are pushed into a [`ResultSink`] as
//! they are parsed rather than returned as a collection.

use std::io::Write;
use std::path::PathBuf;

use crate::auth::authenticate;
use crate::client::{ClientConfig, FilelistClient};
use crate::error::Result;
use crate::parser::{
    RESULTS_PER_PAGE, has_next_page, is_empty_results, is_results_page, parse_result_fragment,
    split_result_fragments,
};
use crate::sink::ResultSink;
use crate::types::{Category, Credentials, TorrentResult};
use crate::url::{build_search_path, normalize_query};

/// Search adapter for filelist.io: one authenticated session, one
/// request in flight at a time.
pub struct FilelistScraper {
    client: FilelistClient,
    credentials: Credentials,
}

impl FilelistScraper {
    /// Create a new scraper with default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(ClientConfig::default(), credentials)
    }

    /// Create a new scraper with custom client configuration
    pub fn with_config(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        let client = FilelistClient::with_config(config)?;
        Ok(Self {
            client,
            credentials,
        })
    }

    /// The underlying session client (latch state, configuration).
    pub fn client(&self) -> &FilelistClient {
        &self.client
    }

    /// Authenticate the session. Returns whether login succeeded;
    /// failure detail is logged and reflected in the fault latch.
    pub async fn login(&self) -> bool {
        match authenticate(&self.client, &self.credentials).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("authentication failed: {e}");
                false
            }
        }
    }

    /// Run a search and emit every parsed result into `sink`.
    ///
    /// `what` is the host-escaped query; `category_name` is resolved
    /// against the fixed category table, with unknown names falling
    /// back to "all". Pages are fetched in order until the site stops
    /// offering more, a page comes back short, or the hard page
    /// ceiling is reached.
    ///
    /// With the fault latch set this emits exactly one synthetic error
    /// entry, clears the latch, and performs no network access.
    pub async fn search(&self, what: &str, category_name: &str, sink: &mut dyn ResultSink) {
        if self.report_fault(sink) {
            return;
        }

        let query = normalize_query(what);
        let category = Category::from_name(category_name);
        tracing::info!(query = %query, category = category.code(), "starting search");

        let max_pages = self.client.config().max_pages;
        let mut total = 0usize;

        for page in 0..max_pages {
            let path = build_search_path(&query, category.code(), page);
            let Some(body) = self.client.get_text(&path).await else {
                // Keep whatever was already emitted.
                tracing::warn!(page, "results page unreachable, stopping pagination");
                break;
            };

            if !is_results_page(&body) {
                tracing::warn!(page, "unexpected page body, stopping pagination");
                break;
            }

            if is_empty_results(&body) {
                tracing::info!(query = %query, "search matched nothing");
                break;
            }

            let mut emitted_this_page = 0usize;
            for fragment in split_result_fragments(&body) {
                if let Some(result) = parse_result_fragment(fragment) {
                    sink.emit(&result);
                    emitted_this_page += 1;
                }
            }
            total += emitted_this_page;

            // Both conditions gate continuation: a short page is the
            // last one, and a full page without a next-link is too.
            if emitted_this_page < RESULTS_PER_PAGE || !has_next_page(&body) {
                break;
            }
        }

        tracing::info!(query = %query, total, "search finished");
    }

    /// Fetch a .torrent file and hand it off as a temporary file.
    ///
    /// Returns the written file's path paired with the original URL;
    /// the file is not cleaned up here, ownership moves to the caller.
    /// A failed fetch returns `None` with no file created. With the
    /// fault latch set this emits the synthetic error entry instead.
    pub async fn download_torrent(
        &self,
        url: &str,
        sink: &mut dyn ResultSink,
    ) -> Option<(PathBuf, String)> {
        if self.report_fault(sink) {
            return None;
        }

        let path = url
            .strip_prefix(self.client.config().base_url.as_str())
            .unwrap_or(url);

        let bytes = self.client.get_bytes(path).await?;

        match write_torrent_file(&bytes) {
            Ok(file_path) => {
                tracing::info!(url = %url, file = %file_path.display(), "torrent file written");
                Some((file_path, url.to_string()))
            }
            Err(e) => {
                tracing::error!(url = %url, "failed to write torrent file: {e}");
                None
            }
        }
    }

    /// If the latch is set: emit the single synthetic error entry,
    /// clear the latch, and tell the caller to bail out.
    fn report_fault(&self, sink: &mut dyn ResultSink) -> bool {
        if !self.client.critical_error() {
            return false;
        }
        tracing::warn!("client is in fault state, emitting error entry");
        sink.emit(&TorrentResult::synthetic_error());
        self.client.clear_critical_error();
        true
    }
}

/// Persist downloaded bytes as a `.torrent` temp file that outlives
/// this process's interest in it.
fn write_torrent_file(bytes: &[u8]) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("filelist-")
        .suffix(".torrent")
        .tempfile()?;
    file.write_all(bytes)?;
    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::VecSink;

    fn offline_scraper() -> FilelistScraper {
        // Unroutable address: any network access in these tests is a bug.
        let config = ClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            max_retries: 0,
            ..Default::default()
        };
        FilelistScraper::with_config(config, Credentials::default()).unwrap()
    }

    #[test]
    fn test_scraper_creation() {
        let scraper = FilelistScraper::new(Credentials::default());
        assert!(scraper.is_ok());
    }

    #[tokio::test]
    async fn test_search_with_latch_emits_single_error_entry() {
        let scraper = offline_scraper();
        scraper.client().set_critical_error();

        let mut sink = VecSink::new();
        scraper.search("ubuntu", "all", &mut sink).await;

        assert_eq!(sink.results.len(), 1);
        assert!(sink.results[0].name.contains("filelist.log"));
        // Latch resets immediately after the error path fires once.
        assert!(!scraper.client().critical_error());
    }

    #[tokio::test]
    async fn test_download_with_latch_emits_error_and_returns_none() {
        let scraper = offline_scraper();
        scraper.client().set_critical_error();

        let mut sink = VecSink::new();
        let handoff = scraper
            .download_torrent("http://127.0.0.1:1/download.php?id=1", &mut sink)
            .await;

        assert!(handoff.is_none());
        assert_eq!(sink.results.len(), 1);
        assert!(!scraper.client().critical_error());
    }

    #[tokio::test]
    async fn test_failed_download_creates_no_file() {
        let scraper = offline_scraper();
        let mut sink = VecSink::new();
        let handoff = scraper
            .download_torrent("http://127.0.0.1:1/download.php?id=1", &mut sink)
            .await;
        assert!(handoff.is_none());
        assert!(sink.results.is_empty());
    }

    #[test]
    fn test_write_torrent_file_roundtrip() {
        let path = write_torrent_file(b"d8:announce0:e").expect("write should succeed");
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("torrent"));
        let contents = std::fs::read(&path).expect("file should exist");
        assert_eq!(contents, b"d8:announce0:e");
        std::fs::remove_file(path).ok();
    }
}
