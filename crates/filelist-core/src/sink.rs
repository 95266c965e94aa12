//! Result delivery seam.
//!
//! The scraper emits each parsed row as soon as it exists instead of
//! returning a collection; the sink decides what emission means (the
//! CLI prints host-protocol lines, tests collect into a Vec).

use crate::types::TorrentResult;

/// Receives each search result as it is extracted.
pub trait ResultSink {
    fn emit(&mut self, result: &TorrentResult);
}

/// Sink that collects results into a vector. Handy for tests and for
/// callers that do want a collection after all.
#[derive(Debug, Default)]
pub struct VecSink {
    pub results: Vec<TorrentResult>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for VecSink {
    fn emit(&mut self, result: &TorrentResult) {
        self.results.push(result.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink = VecSink::new();
        let first = TorrentResult::from_parsed(
            "1".to_string(),
            "a".to_string(),
            "-1".to_string(),
            "0".to_string(),
            "0".to_string(),
        );
        let second = TorrentResult::from_parsed(
            "2".to_string(),
            "b".to_string(),
            "-1".to_string(),
            "0".to_string(),
            "0".to_string(),
        );
        sink.emit(&first);
        sink.emit(&second);
        assert_eq!(sink.results.len(), 2);
        assert_eq!(sink.results[0].id, "1");
        assert_eq!(sink.results[1].id, "2");
    }
}
