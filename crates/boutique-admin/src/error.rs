//! Error types for the admin back-office

use boutique_backend::BackendError;
use boutique_catalog::ValidationError;

/// Admin login and session errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email address")]
    UnknownEmail,

    #[error("Invalid password")]
    WrongPassword,

    #[error("not signed in")]
    NotAuthenticated,

    #[error("admin credentials not configured: {0}")]
    NotConfigured(String),
}

/// Admin service errors
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl AdminError {
    /// Check if retrying the same call could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Backend(e) => e.is_retryable(),
            Self::Auth(_) | Self::Validation(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boutique_catalog::FieldError;

    #[test]
    fn auth_messages_match_login_form() {
        assert_eq!(AuthError::UnknownEmail.to_string(), "Invalid email address");
        assert_eq!(AuthError::WrongPassword.to_string(), "Invalid password");
    }

    #[test]
    fn admin_error_retryable() {
        let validation = ValidationError {
            fields: vec![FieldError::new("name", "required")],
        };
        assert!(!AdminError::from(validation).is_retryable());
        assert!(AdminError::from(BackendError::Unavailable("x".into())).is_retryable());
    }
}
