//! Host-protocol output.
//!
//! The host consumes one pipe-delimited line per result on standard
//! output: download link, name, size, seeders, leechers, engine URL,
//! and description link, in that order.

use filelist_core::{ResultSink, TorrentResult};

/// Formats one result as a host protocol line.
pub fn host_line(result: &TorrentResult) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}",
        result.download_url,
        result.name,
        result.size,
        result.seeders,
        result.leechers,
        result.engine_url,
        result.detail_url,
    )
}

/// Sink that prints each result to stdout as the host expects.
pub struct StdoutSink;

impl ResultSink for StdoutSink {
    fn emit(&mut self, result: &TorrentResult) {
        println!("{}", host_line(result));
    }
}
