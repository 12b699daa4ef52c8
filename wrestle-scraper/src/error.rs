use std::path::PathBuf;

use thiserror::Error;

pub type ScrapeResult<T> = Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Bad or missing credentials, unexpected login form, or a lost session.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Expected markup was not on the page.
    #[error("extraction failed at {url}: {reason}")]
    Extraction { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("browser error: {0}")]
    Browser(String),

    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScrapeError {
    pub fn extraction(url: impl Into<String>, reason: impl Into<String>) -> Self {
        ScrapeError::Extraction {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether the whole run must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScrapeError::Authentication(_) | ScrapeError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_fatality() {
        assert!(ScrapeError::Authentication("bad password".into()).is_fatal());
        assert!(ScrapeError::Config("bad range".into()).is_fatal());
        assert!(!ScrapeError::extraction("/x", "missing").is_fatal());
        assert!(!ScrapeError::Status { url: "/x".into(), status: 500 }.is_fatal());
    }
}
