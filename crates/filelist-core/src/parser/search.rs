//! Browse-page parser for filelist.io.
//!
//! Splits a results page into per-torrent row fragments and extracts
//! the fields of each row. Every field except the id has a documented
//! default; a row without an id is dropped entirely.

use regex::Regex;

use crate::types::TorrentResult;

/// Number of rows a full browse page carries. A page with fewer rows
/// is the last one.
pub const RESULTS_PER_PAGE: usize = 20;

/// Marker present on every genuine results page ("search results for").
const RESULTS_MARKER: &str = "Rezultatele cautarii dupa";

/// Marker the site shows when a search matched nothing.
const EMPTY_MARKER: &str = "Nu s-a gasit nimic!";

/// Marker of the next-page affordance in the pagination strip.
const NEXT_PAGE_MARKER: &str = "Pagina urmatoare";

// ---------------------------------------------------------------------------
// Page-level predicates
// ---------------------------------------------------------------------------

/// Whether the body looks like a browse results page at all. A body
/// without this marker is an error or block page and ends pagination.
pub fn is_results_page(html: &str) -> bool {
    html.contains(RESULTS_MARKER)
}

/// Whether the site reported an empty result set.
pub fn is_empty_results(html: &str) -> bool {
    html.contains(EMPTY_MARKER)
}

/// Whether the pagination strip offers a next page.
pub fn has_next_page(html: &str) -> bool {
    html.contains(NEXT_PAGE_MARKER)
}

// ---------------------------------------------------------------------------
// Fragment extraction
// ---------------------------------------------------------------------------

/// Splits a browse page into torrent-row fragments.
///
/// A row opens with `<div class='torrentrow'>` and closes with the
/// clearfix div followed by the row's own closing tag. The match is
/// non-greedy so adjacent rows never merge.
pub fn split_result_fragments(html: &str) -> Vec<&str> {
    let Ok(re) = Regex::new(r"(?s)<div class='torrentrow'>.*?<div class='clearfix'></div>\s*</div>")
    else {
        return Vec::new();
    };
    re.find_iter(html).map(|m| m.as_str()).collect()
}

/// Extracts one [`TorrentResult`] from a row fragment.
///
/// Returns `None` when the fragment has no extractable torrent id;
/// every other missing field resolves to its default ("-1" size,
/// "0" counts, empty name).
pub fn parse_result_fragment(fragment: &str) -> Option<TorrentResult> {
    let Some(id) = extract_id(fragment) else {
        tracing::warn!("dropping result row without a torrent id");
        return None;
    };

    let name = extract_name(fragment).unwrap_or_else(|| {
        tracing::debug!(id = %id, "result row has no title attribute");
        String::new()
    });
    let size = extract_size(fragment).unwrap_or_else(|| "-1".to_string());
    let seeders = extract_seeders(fragment).unwrap_or_else(|| "0".to_string());
    let leechers = extract_leechers(fragment).unwrap_or_else(|| "0".to_string());

    Some(TorrentResult::from_parsed(id, name, size, seeders, leechers))
}

/// Numeric id from the details link, e.g. `details.php?id=123456`.
fn extract_id(fragment: &str) -> Option<String> {
    let re = Regex::new(r"details\.php\?id=(\d+)").ok()?;
    re.captures(fragment)
        .map(|c| c[1].to_string())
}

/// Torrent name from the first quoted `title` attribute.
fn extract_name(fragment: &str) -> Option<String> {
    let re = Regex::new(r"title='([^']+)'").ok()?;
    re.captures(fragment).map(|c| c[1].to_string())
}

/// Size as "<amount> <unit>" from the small-font cell, where amount
/// and unit are separated by a line break in the markup.
fn extract_size(fragment: &str) -> Option<String> {
    let re = Regex::new(r"<font class='small'>([\d.,]+)<br />([A-Za-z]+)").ok()?;
    re.captures(fragment)
        .map(|c| format!("{} {}", &c[1], &c[2]))
}

/// Seeder count from the green-colored font tag.
fn extract_seeders(fragment: &str) -> Option<String> {
    let re = Regex::new(r"<font color=#008000>(\d+)</font>").ok()?;
    re.captures(fragment).map(|c| c[1].to_string())
}

/// Leecher count from the inline-styled span.
fn extract_leechers(fragment: &str) -> Option<String> {
    let re = Regex::new(r"style='color: #720e0e;?'>(\d+)").ok()?;
    re.captures(fragment).map(|c| c[1].to_string())
}
