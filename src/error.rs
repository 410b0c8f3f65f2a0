use thiserror::Error;

/// Error type for nblm operations.
#[derive(Debug, Error)]
pub enum NblmError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status code.
    #[error("HTTP {status} from {endpoint}")]
    Http { status: u16, endpoint: String },

    /// The session cookies no longer authenticate; the host redirected to its login page.
    #[error("Authentication expired: cookies were redirected to the login page. Re-extract cookies and call save_auth_tokens.")]
    AuthExpired,

    /// No credentials were found in the environment or the token cache.
    #[error("No authentication found: {0}")]
    MissingAuth(String),

    /// The landing page did not carry the expected embedded tokens.
    #[error("Token extraction failed: {0}")]
    TokenExtraction(String),

    /// Caller-supplied input was rejected before any request was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(String),

    /// Local filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization of local data failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NblmError {
    /// Build a validation error naming the rejected value and every accepted one.
    pub fn invalid_choice(field: &str, got: &str, accepted: &[&str]) -> Self {
        NblmError::Validation(format!(
            "Invalid {field} '{got}'. Must be one of: {}",
            accepted.join(", ")
        ))
    }
}

impl From<reqwest::Error> for NblmError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => NblmError::Http {
                status: status.as_u16(),
                endpoint: err
                    .url()
                    .map(|u| u.path().to_string())
                    .unwrap_or_default(),
            },
            None => NblmError::Transport(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_choice_lists_accepted_values() {
        let err = NblmError::invalid_choice("goal", "chatty", &["default", "custom"]);
        assert_eq!(
            err.to_string(),
            "Validation error: Invalid goal 'chatty'. Must be one of: default, custom"
        );
    }

    #[test]
    fn test_auth_expired_mentions_reauthentication() {
        assert!(NblmError::AuthExpired
            .to_string()
            .contains("save_auth_tokens"));
    }
}
