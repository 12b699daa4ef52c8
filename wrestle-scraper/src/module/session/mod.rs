mod browser;
mod credentials;
mod http;

pub use browser::BrowserSession;
pub use credentials::{Credentials, EMAIL_VAR, PASSWORD_VAR};
pub use http::HttpSession;

///! Authenticated browsing context
///!
///! Full match histories on the site are only visible after logging in.
///! Every fetch goes through a [`Session`] handle that carries the login.
use async_trait::async_trait;
use reqwest::Url;

use crate::config::{ScraperConfig, SessionBackend};
use crate::error::ScrapeResult;

pub const LOGIN_PATH: &str = "/account/login";

#[async_trait]
pub trait Session: Send + Sync {
    /// Fetch the HTML of a site path such as `/d1/rankings/dual`.
    async fn fetch_page(&self, path: &str) -> ScrapeResult<String>;
}

/// Log in with the backend selected in `config`.
pub async fn login(config: &ScraperConfig, credentials: &Credentials) -> ScrapeResult<Box<dyn Session>> {
    tracing::info!("Logging in to {} ({:?} backend)", config.base_url, config.backend);
    let session: Box<dyn Session> = match config.backend {
        SessionBackend::Http => Box::new(HttpSession::login(config, credentials).await?),
        SessionBackend::Browser => Box::new(BrowserSession::login(config, credentials).await?),
    };
    tracing::info!("Logged in as {}", credentials.email);
    Ok(session)
}

/// Whether a response landed on the login form, i.e. the session is not authenticated.
pub(crate) fn is_login_url(url: &Url) -> bool {
    url.path().trim_end_matches('/').eq_ignore_ascii_case(LOGIN_PATH)
}

pub(crate) fn is_login_url_str(url: &str) -> bool {
    Url::parse(url).map(|u| is_login_url(&u)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_login_url() {
        assert!(is_login_url_str("https://www.wrestlestat.com/account/login"));
        assert!(is_login_url_str("https://www.wrestlestat.com/Account/Login/?ReturnUrl=%2F"));
        assert!(!is_login_url_str("https://www.wrestlestat.com/"));
        assert!(!is_login_url_str("https://www.wrestlestat.com/wrestler/1/x/profile"));
        assert!(!is_login_url_str("not a url"));
    }
}
