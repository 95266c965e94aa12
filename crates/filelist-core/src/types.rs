//! Core data types for the filelist.io search adapter.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::url::{ENGINE_URL, build_details_url, build_download_url};

/// One torrent row extracted from a filelist.io browse page.
///
/// Numeric fields are kept as strings because the host protocol is
/// line-oriented text and the site sometimes omits them entirely;
/// absent values resolve to documented defaults instead of failing
/// the whole row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentResult {
    /// Numeric torrent id from the details link. Never empty; a row
    /// without an id is dropped during parsing.
    pub id: String,

    /// Torrent name from the title attribute
    pub name: String,

    /// Human-readable size, e.g. "4.3 GB", or "-1" when the size
    /// markup is absent
    pub size: String,

    /// Seeder count as text, "0" when absent
    pub seeders: String,

    /// Leecher count as text, "0" when absent
    pub leechers: String,

    /// Full URL of the torrent description page
    pub detail_url: String,

    /// Full URL of the .torrent download endpoint
    pub download_url: String,

    /// Base URL of the search engine
    pub engine_url: String,
}

impl TorrentResult {
    /// Build a result from the fields the parser extracts; the three
    /// URLs are derived from the id.
    pub fn from_parsed(id: String, name: String, size: String, seeders: String, leechers: String) -> Self {
        let detail_url = build_details_url(&id);
        let download_url = build_download_url(&id);
        Self {
            id,
            name,
            size,
            seeders,
            leechers,
            detail_url,
            download_url,
            engine_url: ENGINE_URL.to_string(),
        }
    }

    /// The single high-visibility entry emitted when the client is in
    /// the fault state. Shows up as a pseudo-result in the host UI so
    /// the operator notices something is wrong without digging through
    /// process output.
    pub fn synthetic_error() -> Self {
        Self {
            id: "0".to_string(),
            name: "FILELIST ERROR: login or connection failed, check filelist.log".to_string(),
            size: "-1".to_string(),
            seeders: "0".to_string(),
            leechers: "0".to_string(),
            detail_url: ENGINE_URL.to_string(),
            download_url: ENGINE_URL.to_string(),
            engine_url: ENGINE_URL.to_string(),
        }
    }
}

/// Search categories supported by filelist.io, with their site-side
/// numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    All,
    Software,
    Games,
    Music,
    Movies,
    Tv,
    Anime,
}

impl Category {
    /// Resolve a host-supplied category name. Unknown names fall back
    /// to [`Category::All`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "software" => Category::Software,
            "games" => Category::Games,
            "music" => Category::Music,
            "movies" => Category::Movies,
            "tv" => Category::Tv,
            "anime" => Category::Anime,
            _ => Category::All,
        }
    }

    /// The numeric code the browse page expects in the `cat` parameter.
    pub fn code(&self) -> &'static str {
        match self {
            Category::All => "0",
            Category::Software => "8",
            Category::Games => "9",
            Category::Music => "11",
            Category::Movies => "19",
            Category::Tv => "21",
            Category::Anime => "24",
        }
    }
}

/// Placeholder values shipped in source; treated as "not configured".
pub const PLACEHOLDER_USERNAME: &str = "your_username_here";
pub const PLACEHOLDER_PASSWORD: &str = "your_password_here";

/// Login credentials, loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: PLACEHOLDER_USERNAME.to_string(),
            password: PLACEHOLDER_PASSWORD.to_string(),
        }
    }
}

impl Credentials {
    /// Load credentials from a JSON file. A missing file is not an
    /// error: the in-source placeholders are returned instead, and the
    /// client later refuses to authenticate with them.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(credentials) => credentials,
                Err(e) => {
                    tracing::warn!("credentials file is not valid JSON, using placeholders: {e}");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!("credentials file not found at {}, using placeholders", path.display());
                Self::default()
            }
        }
    }

    /// Whether either field still holds the in-source placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.username == PLACEHOLDER_USERNAME || self.password == PLACEHOLDER_PASSWORD
    }
}
