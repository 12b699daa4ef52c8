///! Headless Chromium session
///!
///! Drives a real browser tab through the login form, for when the site
///! serves content that only renders with JavaScript.

use std::sync::Arc;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};

use super::{Credentials, LOGIN_PATH, Session, is_login_url_str};
use crate::config::ScraperConfig;
use crate::error::{ScrapeError, ScrapeResult};

pub struct BrowserSession {
    // Dropping the browser kills the Chromium process
    _browser: Browser,
    tab: Arc<Tab>,
    base_url: String,
}

fn browser_error(context: &'static str) -> impl Fn(anyhow::Error) -> ScrapeError {
    move |e| ScrapeError::Browser(format!("{}: {}", context, e))
}

/// Type into the input matching `selector`; a missing input means the form changed.
fn fill_input(tab: &Tab, selector: &str, text: &str) -> ScrapeResult<()> {
    let input = tab
        .wait_for_element(selector)
        .map_err(|_| ScrapeError::Authentication(format!("login form has no {}", selector)))?;
    input
        .type_into(text)
        .map_err(browser_error("Failed to type into login form"))?;
    Ok(())
}

impl BrowserSession {
    pub async fn login(config: &ScraperConfig, credentials: &Credentials) -> ScrapeResult<Self> {
        let login_url = config.url(LOGIN_PATH);
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let timeout = config.page_timeout();
        let email = credentials.email.clone();
        let password = credentials.password().to_string();

        // headless_chrome is blocking
        tokio::task::spawn_blocking(move || -> ScrapeResult<Self> {
            let launch_options = LaunchOptions {
                headless: true,
                sandbox: false,
                ..Default::default()
            };
            let browser = Browser::new(launch_options).map_err(browser_error("Failed to launch headless browser"))?;
            let tab = browser.new_tab().map_err(browser_error("Failed to create new tab"))?;
            tab.set_default_timeout(timeout);

            tab.navigate_to(&login_url)
                .and_then(|t| t.wait_until_navigated())
                .map_err(browser_error("Failed to open login page"))?;

            fill_input(&tab, "input[name='Username']", &email)?;
            fill_input(&tab, "input[name='Password']", &password)?;

            tab.wait_for_element("button[type='submit']")
                .map_err(|_| ScrapeError::Authentication("login form has no submit button".to_string()))?
                .click()
                .map_err(browser_error("Failed to submit login form"))?;
            tab.wait_until_navigated()
                .map_err(browser_error("Login navigation did not finish"))?;

            if is_login_url_str(&tab.get_url()) {
                return Err(ScrapeError::Authentication("credentials rejected".to_string()));
            }

            Ok(Self {
                _browser: browser,
                tab,
                base_url,
            })
        })
        .await
        .map_err(|e| ScrapeError::Browser(format!("login task failed: {}", e)))?
    }
}

#[async_trait]
impl Session for BrowserSession {
    async fn fetch_page(&self, path: &str) -> ScrapeResult<String> {
        let tab = self.tab.clone();
        let url = format!("{}{}", self.base_url, path);

        tokio::task::spawn_blocking(move || -> ScrapeResult<String> {
            tab.navigate_to(&url)
                .and_then(|t| t.wait_until_navigated())
                .map_err(|e| ScrapeError::Browser(format!("Failed to load {}: {}", url, e)))?;

            if is_login_url_str(&tab.get_url()) {
                return Err(ScrapeError::Authentication(format!(
                    "session lost: redirected to login while fetching {}",
                    url
                )));
            }

            tab.get_content()
                .map_err(|e| ScrapeError::Browser(format!("Failed to read {}: {}", url, e)))
        })
        .await
        .map_err(|e| ScrapeError::Browser(format!("fetch task failed: {}", e)))?
    }
}
