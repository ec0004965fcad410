//! Gateway configuration.
//!
//! Built with the `with_*` methods and checked once with
//! [`ProxyConfig::validate`] before the server starts.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use scribe_core::services::DEFAULT_DRAFT_EXTENSION;

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default port of the gateway.
pub const DEFAULT_PORT: u16 = 4891;

/// CORS configuration for the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

impl CorsConfig {
    /// Allow exactly `origins`, or everything when the list is empty.
    pub fn from_origins(origins: Vec<String>) -> Self {
        if origins.is_empty() {
            Self::AllowAll
        } else {
            Self::AllowOrigins(origins)
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Upstream URL must start with http:// or https://, got '{0}'")]
    InvalidUpstreamUrl(String),

    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Draft extension must be a bare extension like 'qmd', got '{0}'")]
    InvalidExtension(String),
}

/// Configuration for the gateway.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Base URL of the Ollama runtime, without a trailing slash.
    pub(crate) ollama_base_url: String,
    /// Timeout applied to every upstream request, streaming included.
    pub(crate) request_timeout: Duration,
    /// Directory served under `/static`, if any.
    pub(crate) static_dir: Option<PathBuf>,
    /// Extension of drafted posts.
    pub(crate) draft_extension: String,
    pub(crate) cors: CorsConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            ollama_base_url: DEFAULT_OLLAMA_URL.to_string(),
            request_timeout: Duration::from_secs(120),
            static_dir: None,
            draft_extension: DEFAULT_DRAFT_EXTENSION.to_string(),
            cors: CorsConfig::AllowAll,
        }
    }
}

impl ProxyConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Ollama base URL.
    ///
    /// Defaults to `http://localhost:11434`.
    #[must_use]
    pub fn with_ollama_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.ollama_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the upstream request timeout.
    ///
    /// Defaults to 120 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Serve files from `dir` under `/static`.
    #[must_use]
    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    /// Set the extension of drafted posts.
    ///
    /// Defaults to `qmd`.
    #[must_use]
    pub fn with_draft_extension(mut self, extension: impl Into<String>) -> Self {
        self.draft_extension = extension.into();
        self
    }

    /// Set the CORS policy.
    ///
    /// Defaults to allowing all origins.
    #[must_use]
    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    pub fn ollama_base_url(&self) -> &str {
        &self.ollama_base_url
    }

    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Check the configuration for values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.ollama_base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUpstreamUrl(url.clone()));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        let ext = &self.draft_extension;
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(ConfigError::InvalidExtension(ext.clone()));
        }
        Ok(())
    }
}
