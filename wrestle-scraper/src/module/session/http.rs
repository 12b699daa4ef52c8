///! Cookie-carrying HTTP session
///!
///! Logs in by replaying the site's login form (including its hidden
///! anti-forgery fields) and keeps the auth cookie in the client's store.

use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::{Html, Selector};

use super::{Credentials, LOGIN_PATH, Session, is_login_url};
use crate::config::ScraperConfig;
use crate::error::{ScrapeError, ScrapeResult};

const USER_AGENT: &str = concat!("Mozilla/5.0 wrestle-scraper/", env!("CARGO_PKG_VERSION"));

const USERNAME_FIELD: &str = "Username";
const PASSWORD_FIELD: &str = "Password";

pub struct HttpSession {
    client: Client,
    base_url: String,
}

/// The parts of the login form that must be posted back.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LoginForm {
    action: Option<String>,
    hidden: Vec<(String, String)>,
}

fn selector(css: &str) -> ScrapeResult<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Config(format!("invalid selector '{}': {:?}", css, e)))
}

/// Find the form holding both credential inputs and collect its hidden fields.
fn parse_login_form(html: &str) -> ScrapeResult<LoginForm> {
    let document = Html::parse_document(html);
    let form_sel = selector("form")?;
    let user_sel = selector(&format!("input[name='{}']", USERNAME_FIELD))?;
    let pass_sel = selector(&format!("input[name='{}']", PASSWORD_FIELD))?;
    let hidden_sel = selector("input[type='hidden'][name]")?;

    let form = document
        .select(&form_sel)
        .find(|form| form.select(&user_sel).next().is_some() && form.select(&pass_sel).next().is_some())
        .ok_or_else(|| {
            ScrapeError::Authentication("login page has no form with Username and Password fields".to_string())
        })?;

    let hidden = form
        .select(&hidden_sel)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            let value = input.value().attr("value").unwrap_or_default();
            Some((name.to_string(), value.to_string()))
        })
        .collect();

    Ok(LoginForm {
        action: form
            .value()
            .attr("action")
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string),
        hidden,
    })
}

impl HttpSession {
    fn build_client(config: &ScraperConfig) -> ScrapeResult<Client> {
        Client::builder()
            .cookie_store(true)
            .timeout(config.page_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ScrapeError::Fetch {
                url: config.base_url.clone(),
                source,
            })
    }

    pub async fn login(config: &ScraperConfig, credentials: &Credentials) -> ScrapeResult<Self> {
        let client = Self::build_client(config)?;
        let login_url = config.url(LOGIN_PATH);

        let page = client
            .get(&login_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| ScrapeError::Fetch {
                url: login_url.clone(),
                source,
            })?
            .text()
            .await
            .map_err(|source| ScrapeError::Fetch {
                url: login_url.clone(),
                source,
            })?;

        let form = parse_login_form(&page)?;
        let post_url = match &form.action {
            Some(action) => Url::parse(&login_url)
                .and_then(|base| base.join(action))
                .map_err(|e| ScrapeError::Authentication(format!("bad login form action '{}': {}", action, e)))?
                .to_string(),
            None => login_url.clone(),
        };

        let mut fields = form.hidden;
        fields.push((USERNAME_FIELD.to_string(), credentials.email.clone()));
        fields.push((PASSWORD_FIELD.to_string(), credentials.password().to_string()));

        tracing::debug!("Posting login form to {} ({} fields)", post_url, fields.len());
        let response = client
            .post(&post_url)
            .form(&fields)
            .send()
            .await
            .map_err(|source| ScrapeError::Fetch {
                url: post_url.clone(),
                source,
            })?;

        if is_login_url(response.url()) {
            return Err(ScrapeError::Authentication("credentials rejected".to_string()));
        }
        if !response.status().is_success() {
            return Err(ScrapeError::Authentication(format!(
                "login returned HTTP {}",
                response.status()
            )));
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn fetch_page(&self, path: &str) -> ScrapeResult<String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::trace!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ScrapeError::Fetch { url: url.clone(), source })?;

        if is_login_url(response.url()) {
            return Err(ScrapeError::Authentication(format!(
                "session lost: redirected to login while fetching {}",
                url
            )));
        }
        if !response.status().is_success() {
            return Err(ScrapeError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| ScrapeError::Fetch { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_form_collects_hidden_fields() {
        let html = r#"
            <form action="/search"><input name="q"></form>
            <form method="post" action="/account/login?ReturnUrl=%2F">
                <input type="hidden" name="__RequestVerificationToken" value="tok123">
                <input name="Username" type="email">
                <input name="Password" type="password">
                <input type="hidden" name="RememberMe" value="false">
                <button type="submit">Log in</button>
            </form>"#;
        let form = parse_login_form(html).unwrap();
        assert_eq!(form.action.as_deref(), Some("/account/login?ReturnUrl=%2F"));
        assert_eq!(
            form.hidden,
            vec![
                ("__RequestVerificationToken".to_string(), "tok123".to_string()),
                ("RememberMe".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_login_form_mismatch() {
        let html = r#"<form><input name="Email"><input name="Password"></form>"#;
        let err = parse_login_form(html).unwrap_err();
        assert!(matches!(err, ScrapeError::Authentication(_)));
    }

    #[test]
    fn test_parse_login_form_without_action() {
        let html = r#"<form method="post"><input name="Username"><input name="Password"></form>"#;
        let form = parse_login_form(html).unwrap();
        assert_eq!(form.action, None);
        assert!(form.hidden.is_empty());
    }
}
