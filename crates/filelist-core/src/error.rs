//! Error types for the filelist.io search adapter.
//!
//! Splits failures into the two tiers the client cares about: fatal
//! conditions that latch the client into a permanent fault state, and
//! transient conditions that are retried and then silently dropped.

use thiserror::Error;

/// The three login rejections filelist.io reports in the response body
/// of the login-submit endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    /// "Numarul maxim permis de actiuni" - too many login attempts,
    /// locked out for an hour.
    RateLimited,
    /// "User sau parola gresite." - wrong username or password.
    BadCredentials,
    /// "Invalid login attempt!" - stale validator token or the session
    /// cookie was never loaded.
    BadValidator,
}

impl LoginFailure {
    /// Classifies a login-submit response body by its failure marker.
    /// Returns `None` when none of the known markers is present.
    pub fn from_body(body: &str) -> Option<Self> {
        if body.contains("Numarul maxim permis de actiuni") {
            Some(LoginFailure::RateLimited)
        } else if body.contains("User sau parola gresite.") {
            Some(LoginFailure::BadCredentials)
        } else if body.contains("Invalid login attempt!") {
            Some(LoginFailure::BadValidator)
        } else {
            None
        }
    }
}

impl std::fmt::Display for LoginFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginFailure::RateLimited => {
                write!(f, "exceeded maximum number of login attempts, retry in an hour")
            }
            LoginFailure::BadCredentials => write!(f, "wrong username or password"),
            LoginFailure::BadValidator => {
                write!(f, "wrong validator key, or session cookie not loaded")
            }
        }
    }
}

/// Error type for all filelist.io adapter operations.
#[derive(Error, Debug)]
pub enum FilelistError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned 404 for the requested page
    #[error("Page not found: {0}")]
    NotFound(String),

    /// Server returned 403 - client identity rejected
    #[error("Connection refused (403) - blocked client identity")]
    Blocked,

    /// Login submit was rejected with a known failure marker
    #[error("Login failed: {0}")]
    LoginFailed(LoginFailure),

    /// Login page did not contain the anti-forgery validator token
    #[error("Validator token not found on login page")]
    MissingValidator,

    /// Login page did not set the expected session cookie
    #[error("Session cookie not set by login page")]
    MissingSessionCookie,

    /// Credentials are still the in-source placeholders
    #[error("Credentials not configured")]
    CredentialsNotConfigured,

    /// Transient retries exhausted without a successful response
    #[error("Retries exhausted for: {0}")]
    RetriesExhausted(String),

    /// Failed to extract an expected field from HTML
    #[error("Failed to parse HTML: {0}")]
    Parse(String),

    /// Filesystem error during the torrent-file handoff
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilelistError {
    /// Whether the failure is worth another attempt. Fatal conditions
    /// (blocked identity, login rejections, configuration problems)
    /// are not.
    pub fn is_transient(&self) -> bool {
        match self {
            FilelistError::NotFound(_) => true,
            FilelistError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

/// Result type alias for filelist.io adapter operations.
pub type Result<T> = std::result::Result<T, FilelistError>;
