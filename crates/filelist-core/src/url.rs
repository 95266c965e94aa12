//! URL constants and builders for filelist.io endpoints.
//!
//! Request paths are relative; the client prepends its configured base
//! URL. The details/download builders produce absolute URLs because
//! those are handed to the host verbatim.

/// Base URL of the site, reported to the host as the engine URL.
pub const ENGINE_URL: &str = "https://filelist.io/";

/// Login form page (GET). Sets the session cookie and carries the
/// validator token.
pub const LOGIN_PATH: &str = "/login.php";

/// Login submit endpoint (POST form-encoded).
pub const LOGIN_POST_PATH: &str = "/takelogin.php";

/// Search/browse page (GET with query parameters).
pub const BROWSE_PATH: &str = "/browse.php";

/// Torrent description page, keyed by id.
const DETAILS_URL: &str = "https://filelist.io/details.php?id=";

/// Torrent file download endpoint, keyed by id. Requires an
/// authenticated session cookie.
const DOWNLOAD_URL: &str = "https://filelist.io/download.php?id=";

/// Normalizes a host-supplied query string.
///
/// The host escapes search tokens before handing them over, but a
/// quirk in its escaping turns literal spaces into `%20` where the
/// site expects `+`.
///
/// # Example
/// ```
/// use filelist_core::url::normalize_query;
/// assert_eq!(normalize_query("mandalorian%20s01"), "mandalorian+s01");
/// ```
pub fn normalize_query(query: &str) -> String {
    query.replace("%20", "+")
}

/// Builds the browse-page path for one page of search results.
///
/// `searchin=1` restricts matching to torrent names and `sort=5`
/// orders by seeders, mirroring what the site UI produces. `+` is
/// kept verbatim since the query arrives already plus-escaped.
///
/// # Example
/// ```
/// use filelist_core::url::build_search_path;
/// let path = build_search_path("mandalorian+s01", "21", 0);
/// assert_eq!(path, "/browse.php?search=mandalorian+s01&cat=21&searchin=1&sort=5&page=0");
/// ```
pub fn build_search_path(query: &str, category_code: &str, page: u32) -> String {
    let encoded = urlencoding::encode(query).replace("%2B", "+");
    format!(
        "{}?search={}&cat={}&searchin=1&sort=5&page={}",
        BROWSE_PATH, encoded, category_code, page
    )
}

/// Builds the description-page URL for a torrent id.
pub fn build_details_url(id: &str) -> String {
    format!("{}{}", DETAILS_URL, id)
}

/// Builds the .torrent download URL for a torrent id.
pub fn build_download_url(id: &str) -> String {
    format!("{}{}", DOWNLOAD_URL, id)
}
