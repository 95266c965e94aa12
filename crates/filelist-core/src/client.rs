//! HTTP session layer for filelist.io.
//!
//! Owns the cookie-bearing `reqwest` client, the fault latch, and the
//! retry policy. All network I/O in the crate goes through this type:
//! the authenticator and the paginating scraper both call into it, so
//! failure classification lives in exactly one place.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};

use crate::error::{FilelistError, LoginFailure, Result};
use crate::url::LOGIN_POST_PATH;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.4 Safari/605.1.15";

/// Name of the session cookie the login page must set. If the site
/// stops setting it, the login flow is silently broken and we want to
/// fail loudly instead.
const SESSION_COOKIE: &str = "PHPSESSID";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the tracker (default: `https://filelist.io`)
    pub base_url: String,
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    /// Maximum retry attempts for transient errors, per request
    /// chain (default: 3)
    pub max_retries: u32,
    /// Hard ceiling on result pages fetched per search (default: 10)
    pub max_pages: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://filelist.io".to_string(),
            timeout_secs: 10,
            max_retries: 3,
            max_pages: 10,
        }
    }
}

/// Cookie-bearing HTTP client with bounded retries and a one-way
/// fault latch.
///
/// The latch flips on fatal conditions (403, login rejection markers)
/// and makes every later request short-circuit to `None` until the
/// error-reporting path clears it. Transient failures (404, connect
/// errors, timeouts) are retried up to `max_retries` with a per-call
/// attempt counter and then give up without touching the latch.
pub struct FilelistClient {
    client: reqwest::Client,
    jar: Arc<Jar>,
    config: ClientConfig,
    critical_error: AtomicBool,
}

impl FilelistClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .cookie_provider(jar.clone())
            .build()
            .map_err(FilelistError::Http)?;

        Ok(Self {
            client,
            jar,
            config,
            critical_error: AtomicBool::new(false),
        })
    }

    /// Client configuration, shared with the scraper for pagination
    /// bounds.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether the fault latch is set.
    pub fn critical_error(&self) -> bool {
        self.critical_error.load(Ordering::Relaxed)
    }

    /// Latch the client into the permanent fault state.
    pub fn set_critical_error(&self) {
        self.critical_error.store(true, Ordering::Relaxed);
    }

    /// Clear the latch. Called exactly once by the error-reporting
    /// path after the synthetic error entry has been emitted.
    pub fn clear_critical_error(&self) {
        self.critical_error.store(false, Ordering::Relaxed);
    }

    /// Whether the cookie store holds the expected session cookie for
    /// the configured site.
    pub fn has_session_cookie(&self) -> bool {
        let Ok(url) = self.config.base_url.parse() else {
            return false;
        };
        self.jar
            .cookies(&url)
            .and_then(|header| header.to_str().map(str::to_string).ok())
            .is_some_and(|cookies| cookies.contains(SESSION_COOKIE))
    }

    /// GET a path and return the body as lossily decoded text.
    ///
    /// `None` means the request chain gave up: either the latch was
    /// (or became) set, or transient retries were exhausted. Failures
    /// are logged, never surfaced.
    pub async fn get_text(&self, path: &str) -> Option<String> {
        self.execute(path, None, false)
            .await
            .map(|body| String::from_utf8_lossy(&body).into_owned())
    }

    /// POST a form to a path and return the body as text. `login` marks
    /// the one request that is allowed to land on the login-submit
    /// endpoint; its body is returned for marker classification instead
    /// of tripping the latch here.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)], login: bool) -> Option<String> {
        self.execute(path, Some(form), login)
            .await
            .map(|body| String::from_utf8_lossy(&body).into_owned())
    }

    /// GET a path in raw-bytes mode. Used only for .torrent downloads,
    /// which must not go through text decoding.
    pub async fn get_bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.execute(path, None, false).await
    }

    /// Single entry point for all requests: short-circuits on the
    /// latch, performs the bounded retry loop, classifies failures.
    async fn execute(
        &self,
        path: &str,
        form: Option<&[(&str, &str)]>,
        login: bool,
    ) -> Option<Vec<u8>> {
        if self.critical_error() {
            tracing::debug!(path, "skipping request, client is in fault state");
            return None;
        }

        let url = format!("{}{}", self.config.base_url, path);
        let mut attempt: u32 = 0;

        loop {
            match self.try_once(&url, form, login).await {
                Ok(body) => return Some(body),
                Err(e) if e.is_transient() => {
                    attempt += 1;
                    if attempt > self.config.max_retries {
                        tracing::warn!(url = %url, retries = attempt - 1, "giving up after transient failures: {e}");
                        return None;
                    }
                    tracing::debug!(url = %url, attempt, "transient failure, retrying: {e}");
                }
                Err(e) => {
                    match &e {
                        FilelistError::Blocked | FilelistError::LoginFailed(_) => {
                            tracing::error!(url = %url, "fatal request failure: {e}");
                            self.set_critical_error();
                        }
                        _ => tracing::warn!(url = %url, "request failed: {e}"),
                    }
                    return None;
                }
            }
        }
    }

    /// One attempt: send, classify the status, and detect unintended
    /// landings on the login-submit endpoint.
    async fn try_once(
        &self,
        url: &str,
        form: Option<&[(&str, &str)]>,
        login: bool,
    ) -> Result<Vec<u8>> {
        let request = match form {
            Some(fields) => self.client.post(url).form(fields),
            None => self.client.get(url),
        };

        let response = request.send().await.map_err(FilelistError::Http)?;
        let status = response.status();

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(FilelistError::Blocked);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FilelistError::NotFound(url.to_string()));
        }

        // A redirect chain ending on takelogin.php outside the login
        // flow means the session was rejected; the body says why.
        let landed_on_login_post = response.url().path() == LOGIN_POST_PATH;
        let body = response.bytes().await.map_err(FilelistError::Http)?.to_vec();

        if landed_on_login_post && !login {
            let text = String::from_utf8_lossy(&body);
            let failure = LoginFailure::from_body(&text).unwrap_or(LoginFailure::BadValidator);
            return Err(FilelistError::LoginFailed(failure));
        }

        Ok(body)
    }
}
