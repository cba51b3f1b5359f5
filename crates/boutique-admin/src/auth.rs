//! Admin session gate
//!
//! One configured credential guards the back-office. A successful login
//! writes a session record to the `adminSession` slot; every check slides
//! its expiry forward, and an expired session is cleared on sight.

use crate::error::AuthError;
use boutique_storage::{KeyValueStore, StorageBridge, ADMIN_SESSION_SLOT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Idle time after which a session expires
pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 30 * 60;

/// Role written into every admin session
pub const ADMIN_ROLE: &str = "admin";

/// Hex SHA-256 digest of a password, the form credentials are configured in
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// The single admin credential
#[derive(Clone)]
pub struct AdminCredentials {
    email: String,
    password_sha256: [u8; 32],
}

impl AdminCredentials {
    /// Create from an email and a hex SHA-256 password digest
    pub fn new(email: impl Into<String>, password_sha256: &str) -> Result<Self, AuthError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(AuthError::NotConfigured("admin email is empty".into()));
        }
        let bytes = hex::decode(password_sha256.trim())
            .map_err(|e| AuthError::NotConfigured(format!("password digest: {e}")))?;
        let password_sha256 = <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
            AuthError::NotConfigured("password digest must be 32 bytes of hex".into())
        })?;
        Ok(Self {
            email: email.trim().to_string(),
            password_sha256,
        })
    }

    /// Create from a plain-text password
    pub fn from_password(email: impl Into<String>, password: &str) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password_sha256: sha256(password),
        }
    }

    /// Configured email
    #[inline]
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    fn accepts_email(&self, email: &str) -> bool {
        email.trim().eq_ignore_ascii_case(&self.email)
    }

    fn accepts_password(&self, password: &str) -> bool {
        sha256(password) == self.password_sha256
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password_sha256", &"<redacted>")
            .finish()
    }
}

/// Signed-in admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub email: String,
    pub role: String,
}

/// Persisted session record
///
/// Times are Unix milliseconds, matching the slot's existing format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub user: AdminUser,
    /// Login time
    pub timestamp: i64,
    pub expires_at: i64,
}

impl AdminSession {
    /// Whether the session has lapsed at `now`
    #[inline]
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() > self.expires_at
    }
}

/// Login, logout and session checks against a key-value slot
#[derive(Debug)]
pub struct AdminAuth<S> {
    bridge: StorageBridge<S>,
    credentials: AdminCredentials,
    timeout_ms: i64,
}

impl<S: KeyValueStore> AdminAuth<S> {
    /// Create with the default 30-minute timeout
    pub fn new(store: S, credentials: AdminCredentials) -> Self {
        Self {
            bridge: StorageBridge::new(store),
            credentials,
            timeout_ms: secs_to_ms(DEFAULT_SESSION_TIMEOUT_SECS),
        }
    }

    /// With idle timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_ms = secs_to_ms(secs);
        self
    }

    /// Check credentials and open a session
    pub fn login(&self, email: &str, password: &str) -> Result<AdminUser, AuthError> {
        self.login_at(email, password, Utc::now())
    }

    /// [`login`](Self::login) with an explicit clock
    pub fn login_at(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AdminUser, AuthError> {
        if !self.credentials.accepts_email(email) {
            tracing::warn!("admin login rejected: unknown email");
            return Err(AuthError::UnknownEmail);
        }
        if !self.credentials.accepts_password(password) {
            tracing::warn!("admin login rejected: wrong password");
            return Err(AuthError::WrongPassword);
        }

        let user = AdminUser {
            email: self.credentials.email().to_string(),
            role: ADMIN_ROLE.to_string(),
        };
        let now_ms = now.timestamp_millis();
        let session = AdminSession {
            user: user.clone(),
            timestamp: now_ms,
            expires_at: now_ms.saturating_add(self.timeout_ms),
        };
        self.bridge.save_json(ADMIN_SESSION_SLOT, &session);
        tracing::info!(email = %user.email, "admin signed in");
        Ok(user)
    }

    /// Close the session
    pub fn logout(&self) {
        self.bridge.discard(ADMIN_SESSION_SLOT);
        tracing::info!("admin signed out");
    }

    /// Current user, sliding the session's expiry forward
    ///
    /// A missing or unreadable session means signed out. An expired one is
    /// removed.
    pub fn check_session(&self) -> Option<AdminUser> {
        self.check_session_at(Utc::now())
    }

    /// [`check_session`](Self::check_session) with an explicit clock
    pub fn check_session_at(&self, now: DateTime<Utc>) -> Option<AdminUser> {
        let mut session = self.session()?;
        if session.is_expired_at(now) {
            tracing::info!(email = %session.user.email, "admin session expired");
            self.logout();
            return None;
        }
        session.expires_at = now.timestamp_millis().saturating_add(self.timeout_ms);
        self.bridge.save_json(ADMIN_SESSION_SLOT, &session);
        Some(session.user)
    }

    /// Current user or [`AuthError::NotAuthenticated`]
    pub fn require(&self) -> Result<AdminUser, AuthError> {
        self.check_session().ok_or(AuthError::NotAuthenticated)
    }

    /// Stored session without touching its expiry
    #[must_use]
    pub fn session(&self) -> Option<AdminSession> {
        self.bridge.load_json(ADMIN_SESSION_SLOT)
    }
}

fn sha256(password: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(password.as_bytes()));
    out
}

fn secs_to_ms(secs: u64) -> i64 {
    i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX)
}
