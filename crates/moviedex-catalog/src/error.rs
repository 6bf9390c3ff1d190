use thiserror::Error;

/// Failure of a catalog call. Always non-fatal: callers show a message and
/// offer a retry.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request URL is stripped before wrapping; it may carry `api_key`.
    #[error("network error: {0}")]
    Transport(reqwest::Error),

    #[error("catalog returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("unexpected catalog response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Unauthorized,
    NotFound,
    RateLimited,
    Upstream,
    Decode,
}

impl From<reqwest::Error> for CatalogError {
    fn from(error: reqwest::Error) -> Self {
        CatalogError::Transport(error.without_url())
    }
}

impl CatalogError {
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        CatalogError::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Transport(_) => ErrorKind::Transport,
            CatalogError::Upstream { status: 401, .. } => ErrorKind::Unauthorized,
            CatalogError::Upstream { status: 404, .. } => ErrorKind::NotFound,
            CatalogError::Upstream { status: 429, .. } => ErrorKind::RateLimited,
            CatalogError::Upstream { .. } => ErrorKind::Upstream,
            CatalogError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Message suitable for showing next to a retry affordance
    pub fn user_message(&self) -> String {
        match (self.kind(), self) {
            (ErrorKind::Unauthorized, _) => "Unauthorized: Please check your API key".to_string(),
            (ErrorKind::NotFound, _) => "The requested resource was not found".to_string(),
            (ErrorKind::RateLimited, _) => "Rate limit exceeded. Please try again later".to_string(),
            (ErrorKind::Transport, _) => "Could not reach the movie catalog. Check your connection and try again".to_string(),
            (_, CatalogError::Upstream { message, .. }) if !message.is_empty() => message.clone(),
            _ => "An error occurred. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(CatalogError::upstream(401, "Invalid API key").kind(), ErrorKind::Unauthorized);
        assert_eq!(CatalogError::upstream(404, "").kind(), ErrorKind::NotFound);
        assert_eq!(CatalogError::upstream(429, "").kind(), ErrorKind::RateLimited);
        assert_eq!(CatalogError::upstream(503, "down").kind(), ErrorKind::Upstream);
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            CatalogError::upstream(401, "Invalid API key: You must be granted a valid key.").user_message(),
            "Unauthorized: Please check your API key"
        );
        assert_eq!(
            CatalogError::upstream(500, "Internal error: Something went wrong").user_message(),
            "Internal error: Something went wrong"
        );
        assert_eq!(
            CatalogError::upstream(502, "").user_message(),
            "An error occurred. Please try again."
        );
        assert_eq!(
            CatalogError::Decode("bad json".to_string()).user_message(),
            "An error occurred. Please try again."
        );
    }
}
