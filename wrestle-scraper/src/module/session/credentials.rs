use crate::error::{ScrapeError, ScrapeResult};

pub const EMAIL_VAR: &str = "WRESTLESTAT_EMAIL";
pub const PASSWORD_VAR: &str = "WRESTLESTAT_PASSWORD";

/// Login secrets. The password never appears in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Read `WRESTLESTAT_EMAIL` / `WRESTLESTAT_PASSWORD`.
    pub fn from_env() -> ScrapeResult<Self> {
        Ok(Self::new(require_var(EMAIL_VAR)?, require_var(PASSWORD_VAR)?))
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

fn require_var(name: &str) -> ScrapeResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ScrapeError::Authentication(format!("{} is not set", name))),
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("coach@example.com", "hunter2");
        let shown = format!("{:?}", creds);
        assert!(shown.contains("coach@example.com"));
        assert!(!shown.contains("hunter2"));
        assert_eq!(creds.password(), "hunter2");
    }

    #[test]
    fn test_missing_or_blank_env_var() {
        // Only this test touches these variables
        unsafe {
            std::env::set_var(EMAIL_VAR, "   ");
            std::env::set_var(PASSWORD_VAR, "hunter2");
        }
        let err = Credentials::from_env().unwrap_err();
        assert!(matches!(err, ScrapeError::Authentication(ref reason) if reason.contains(EMAIL_VAR)));

        unsafe { std::env::remove_var(EMAIL_VAR) };
        assert!(matches!(Credentials::from_env(), Err(ScrapeError::Authentication(_))));

        unsafe { std::env::set_var(EMAIL_VAR, "coach@example.com") };
        assert_eq!(Credentials::from_env().unwrap().email, "coach@example.com");

        unsafe {
            std::env::remove_var(EMAIL_VAR);
            std::env::remove_var(PASSWORD_VAR);
        }
    }
}
