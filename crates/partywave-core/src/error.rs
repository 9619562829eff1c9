// Error types for REST calls against the PartyWave backend.

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{status}: {message}")]
    Status {
        status: u16,
        message: String,
        /// Error key from the backend (e.g. `error.idexists`), when present.
        key: Option<String>,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL `{url}`: {message}")]
    InvalidUrl { url: String, message: String },

    /// Update or patch was requested for an entity that has no id yet.
    #[error("{entity} has no id")]
    MissingId { entity: &'static str },
}

impl ApiError {
    /// HTTP status of the failed response, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display_includes_code_and_message() {
        let err = ApiError::Status {
            status: 400,
            message: "A new room cannot already have an ID".into(),
            key: Some("error.idexists".into()),
        };
        assert_eq!(err.to_string(), "400: A new room cannot already have an ID");
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_not_found());
    }

    #[test]
    fn missing_id_has_no_status() {
        let err = ApiError::MissingId { entity: "vote" };
        assert_eq!(err.to_string(), "vote has no id");
        assert_eq!(err.status(), None);
    }
}
