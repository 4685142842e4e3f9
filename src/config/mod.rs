//! Defines the `ResolverConfig` struct holding resolver-wide settings.
//!
//! Credentials are deliberately absent: they are call-scoped (or embedded in
//! the repository URL) and travel with each request's options.

use crate::constants::{
    AZURE_DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT,
};
use std::time::Duration;

pub use builder::ResolverConfigBuilder;
mod builder;

/// Settings shared by every operation of a provider instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Whether reference lists and tree listings are cached between calls.
    pub cache_enabled: bool,
    /// Overall timeout of a single HTTP request.
    pub request_timeout: Duration,
    /// Skip TLS certificate verification (self-hosted servers with private CAs).
    pub accept_invalid_certs: bool,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub use_env_proxy: bool,
    /// Base URL of the hosting REST API, without a trailing slash.
    pub base_url: String,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            accept_invalid_certs: false,
            use_env_proxy: true,
            base_url: AZURE_DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
