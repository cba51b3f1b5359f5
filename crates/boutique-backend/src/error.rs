//! Error types for backend access

/// Backend errors
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("server error: HTTP {status} - {body}")]
    Status { status: u16, body: String },

    #[error("{table} row not found: {id}")]
    NotFound { table: &'static str, id: String },

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("invalid Content-Range header: '{0}'")]
    ContentRange(String),

    #[error("backend not configured: {0}")]
    NotConfigured(String),
}

impl BackendError {
    /// Create a not-found error
    pub fn not_found(table: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            table,
            id: id.to_string(),
        }
    }

    /// Check if a retry could succeed
    ///
    /// Transport failures, 5xx, 429 and injected outages are transient.
    /// Rejections and decode errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Unavailable(_) => true,
            Self::Decode(_)
            | Self::NotFound { .. }
            | Self::Rejected(_)
            | Self::ContentRange(_)
            | Self::NotConfigured(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_retryable() {
        assert!(BackendError::Status {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(BackendError::Status {
            status: 429,
            body: String::new()
        }
        .is_retryable());
        assert!(!BackendError::Status {
            status: 400,
            body: String::new()
        }
        .is_retryable());
        assert!(BackendError::Unavailable("down".into()).is_retryable());
        assert!(!BackendError::not_found("orders", 4).is_retryable());
    }

    #[test]
    fn backend_error_display() {
        assert_eq!(
            BackendError::not_found("products", 12).to_string(),
            "products row not found: 12"
        );
    }
}
