//! Error taxonomy for the HTTP boundary.

use thiserror::Error;

/// Failure of one API operation, classified at the boundary that issued it.
///
/// `Cancelled` is not an error from the user's point of view: it means the
/// owning view was torn down or re-triggered while the request was in
/// flight. Callers drop it silently instead of surfacing a banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request cancelled")]
    Cancelled,

    #[error("network error: {0}")]
    Network(String),

    #[error("api error (status {status})")]
    Api { status: u16, detail: Option<String> },

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// Message to surface in a banner: the backend's `detail` when present,
    /// otherwise the calling operation's generic fallback.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => fallback.to_owned(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_is_not_a_user_facing_error() {
        assert!(ApiError::Cancelled.is_cancelled());
        assert!(!ApiError::Network("offline".into()).is_cancelled());
    }

    #[test]
    fn banner_message_prefers_backend_detail() {
        let with_detail = ApiError::Api {
            status: 400,
            detail: Some("Unknown algorithm code.".into()),
        };
        assert_eq!(
            with_detail.message_or("Failed to create experiment."),
            "Unknown algorithm code."
        );

        let without_detail = ApiError::Api {
            status: 500,
            detail: None,
        };
        assert_eq!(
            without_detail.message_or("Failed to create experiment."),
            "Failed to create experiment."
        );
        assert_eq!(
            ApiError::Network("offline".into()).message_or("Failed to load datasets."),
            "Failed to load datasets."
        );
    }
}
