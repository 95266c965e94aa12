//! Login flow for filelist.io.
//!
//! The site guards its login form with a one-time anti-forgery token
//! (the "validator") and a session cookie, both issued by the login
//! page. Authentication fetches the form, lifts the token out of the
//! markup, confirms the cookie landed, and submits the credentials.
//!
//! Every failure here is fatal: it sets the client's fault latch and
//! is reported to the caller only for logging. There is no retry at
//! this layer beyond what the request executor already does.

use regex::Regex;

use crate::client::FilelistClient;
use crate::error::{FilelistError, LoginFailure, Result};
use crate::types::Credentials;
use crate::url::{LOGIN_PATH, LOGIN_POST_PATH};

/// Authenticate the client's session against the tracker.
///
/// On any fatal path the fault latch is set before the error is
/// returned; callers log the error but observe the failure through
/// the latch.
pub async fn authenticate(client: &FilelistClient, credentials: &Credentials) -> Result<()> {
    if credentials.is_placeholder() {
        client.set_critical_error();
        return Err(FilelistError::CredentialsNotConfigured);
    }

    let Some(login_page) = client.get_text(LOGIN_PATH).await else {
        client.set_critical_error();
        return Err(FilelistError::NotFound(LOGIN_PATH.to_string()));
    };

    let Some(validator) = extract_validator(&login_page) else {
        client.set_critical_error();
        return Err(FilelistError::MissingValidator);
    };

    // The login page must have set the session cookie; if it stopped
    // doing so the site changed and the whole flow is broken.
    if !client.has_session_cookie() {
        client.set_critical_error();
        return Err(FilelistError::MissingSessionCookie);
    }

    let form = [
        ("unlock", "1"),
        ("returnto", "%2F"),
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
        ("validator", validator.as_str()),
    ];

    let Some(body) = client.post_form(LOGIN_POST_PATH, &form, true).await else {
        client.set_critical_error();
        return Err(FilelistError::NotFound(LOGIN_POST_PATH.to_string()));
    };

    if let Some(failure) = LoginFailure::from_body(&body) {
        client.set_critical_error();
        return Err(FilelistError::LoginFailed(failure));
    }

    tracing::info!("logged in to filelist.io");
    Ok(())
}

/// Pulls the one-time validator token out of the login form markup.
fn extract_validator(html: &str) -> Option<String> {
    let re = Regex::new(r"name='validator' value='([^']+)'").ok()?;
    re.captures(html).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_validator_present() {
        let html = "<form><input type='hidden' name='validator' value='abc123def' /></form>";
        assert_eq!(extract_validator(html), Some("abc123def".to_string()));
    }

    #[test]
    fn test_extract_validator_absent() {
        let html = "<form><input type='text' name='username' /></form>";
        assert_eq!(extract_validator(html), None);
    }

    #[test]
    fn test_extract_validator_first_match_wins() {
        let html = "name='validator' value='first' ... name='validator' value='second'";
        assert_eq!(extract_validator(html), Some("first".to_string()));
    }

    #[tokio::test]
    async fn test_placeholder_credentials_fail_without_network() {
        // Unroutable base URL: any network attempt would fail loudly
        // with a connect error, but the placeholder check must reject
        // the credentials before a request is even built.
        let config = crate::client::ClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            max_retries: 0,
            ..Default::default()
        };
        let client = FilelistClient::with_config(config).unwrap();
        let result = authenticate(&client, &Credentials::default()).await;
        assert!(matches!(result, Err(FilelistError::CredentialsNotConfigured)));
        assert!(client.critical_error());
    }
}
