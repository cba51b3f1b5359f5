//! Runtime configuration
//!
//! Loaded from a TOML file, then overlaid with `BOUTIQUE_*` environment
//! variables. Nothing secret has a built-in default.

use crate::error::ConfigError;
use boutique_admin::{AdminCredentials, DEFAULT_SESSION_TIMEOUT_SECS};
use boutique_backend::RestConfig;
use boutique_catalog::LOW_STOCK_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const ENV_BACKEND_URL: &str = "BOUTIQUE_BACKEND_URL";
pub const ENV_BACKEND_KEY: &str = "BOUTIQUE_BACKEND_KEY";
pub const ENV_DATA_DIR: &str = "BOUTIQUE_DATA_DIR";
pub const ENV_ADMIN_EMAIL: &str = "BOUTIQUE_ADMIN_EMAIL";
pub const ENV_ADMIN_PASSWORD_SHA256: &str = "BOUTIQUE_ADMIN_PASSWORD_SHA256";

/// Directory holding the cart and session slots when none is configured
pub const DEFAULT_DATA_DIR: &str = ".boutique";

/// Storefront and back-office settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoutiqueConfig {
    /// Hosted store project URL
    pub backend_url: Option<String>,
    /// Public API key for the hosted store
    pub backend_key: Option<String>,
    /// HTTP timeout for backend calls
    pub request_timeout_secs: u64,
    /// Where the file-backed slots live
    pub data_dir: PathBuf,
    pub admin_email: Option<String>,
    /// Hex SHA-256 of the admin password
    pub admin_password_sha256: Option<String>,
    /// Admin idle timeout
    pub session_timeout_secs: u64,
    /// Stock level below which a product is flagged
    pub low_stock_threshold: u32,
    /// Rows per listing page
    pub page_size: u32,
}

impl Default for BoutiqueConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            backend_key: None,
            request_timeout_secs: 30,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            admin_email: None,
            admin_password_sha256: None,
            session_timeout_secs: DEFAULT_SESSION_TIMEOUT_SECS,
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            page_size: 10,
        }
    }
}

impl fmt::Debug for BoutiqueConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("BoutiqueConfig")
            .field("backend_url", &self.backend_url)
            .field("backend_key", &redact(&self.backend_key))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("data_dir", &self.data_dir)
            .field("admin_email", &self.admin_email)
            .field("admin_password_sha256", &redact(&self.admin_password_sha256))
            .field("session_timeout_secs", &self.session_timeout_secs)
            .field("low_stock_threshold", &self.low_stock_threshold)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl BoutiqueConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML, missing keys taking their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Overlay values from the process environment
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Overlay values from `lookup`; blank values are ignored
    #[must_use]
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_BACKEND_URL) {
            self.backend_url = Some(url);
        }
        if let Some(key) = get(ENV_BACKEND_KEY) {
            self.backend_key = Some(key);
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(email) = get(ENV_ADMIN_EMAIL) {
            self.admin_email = Some(email);
        }
        if let Some(digest) = get(ENV_ADMIN_PASSWORD_SHA256) {
            self.admin_password_sha256 = Some(digest);
        }
        self
    }

    /// With backend URL and key
    #[inline]
    #[must_use]
    pub fn with_backend(mut self, url: impl Into<String>, key: impl Into<String>) -> Self {
        self.backend_url = Some(url.into());
        self.backend_key = Some(key.into());
        self
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// With admin email and password digest
    #[inline]
    #[must_use]
    pub fn with_admin(mut self, email: impl Into<String>, password_sha256: impl Into<String>) -> Self {
        self.admin_email = Some(email.into());
        self.admin_password_sha256 = Some(password_sha256.into());
        self
    }

    /// With session timeout
    #[inline]
    #[must_use]
    pub fn with_session_timeout_secs(mut self, secs: u64) -> Self {
        self.session_timeout_secs = secs;
        self
    }

    /// With low-stock threshold
    #[inline]
    #[must_use]
    pub fn with_low_stock_threshold(mut self, threshold: u32) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    /// With page size
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Reject values no service can run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::invalid("page_size", "must be at least 1"));
        }
        if self.session_timeout_secs == 0 {
            return Err(ConfigError::invalid("session_timeout_secs", "must be at least 1"));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("data_dir", "must not be empty"));
        }
        Ok(())
    }

    /// Hosted store settings, `None` when either URL or key is unset
    #[must_use]
    pub fn rest_config(&self) -> Option<RestConfig> {
        let url = self.backend_url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let key = self.backend_key.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some(RestConfig::new(url, key).with_timeout_secs(self.request_timeout_secs))
    }

    /// The admin credential
    pub fn admin_credentials(&self) -> Result<AdminCredentials, ConfigError> {
        let email = self
            .admin_email
            .as_deref()
            .ok_or(ConfigError::Missing("admin_email"))?;
        let digest = self
            .admin_password_sha256
            .as_deref()
            .ok_or(ConfigError::Missing("admin_password_sha256"))?;
        AdminCredentials::new(email, digest)
            .map_err(|e| ConfigError::invalid("admin_password_sha256", e.to_string()))
    }
}
