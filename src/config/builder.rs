use super::ResolverConfig;
use crate::cli::Cli;
use crate::errors::{Error, Result};
use std::time::Duration;

/// A builder for creating a [`ResolverConfig`] programmatically.
///
/// # Examples
///
/// ```
/// use repofetch::config::ResolverConfigBuilder;
/// use std::time::Duration;
///
/// let config = ResolverConfigBuilder::new()
///     .cache_enabled(false)
///     .request_timeout(Duration::from_secs(30))
///     .base_url("https://azure.internal.example/tfs/")
///     .build()
///     .unwrap();
///
/// assert!(!config.cache_enabled);
/// assert_eq!(config.base_url, "https://azure.internal.example/tfs");
/// ```
#[derive(Debug, Default, Clone)]
pub struct ResolverConfigBuilder {
    cache_enabled: Option<bool>,
    request_timeout: Option<Duration>,
    accept_invalid_certs: Option<bool>,
    use_env_proxy: Option<bool>,
    base_url: Option<String>,
    user_agent: Option<String>,
}

impl ResolverConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the reference/tree cache.
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = Some(enabled);
        self
    }

    /// Sets the overall timeout of a single HTTP request.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Accepts invalid TLS certificates when `true`.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = Some(accept);
        self
    }

    /// Honours proxy settings from the environment when `true`.
    pub fn use_env_proxy(mut self, use_proxy: bool) -> Self {
        self.use_env_proxy = Some(use_proxy);
        self
    }

    /// Overrides the REST API base URL (on-premises servers, tests).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Overrides the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validates the settings and builds the final [`ResolverConfig`].
    ///
    /// # Errors
    /// Returns [`Error::Config`] for a zero timeout or a base URL that is not
    /// an absolute `http(s)` URL.
    pub fn build(self) -> Result<ResolverConfig> {
        let defaults = ResolverConfig::default();

        let request_timeout = self.request_timeout.unwrap_or(defaults.request_timeout);
        if request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero.".to_string(),
            ));
        }

        let base_url = self
            .base_url
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Base URL '{}' must be an absolute http(s) URL.",
                base_url
            )));
        }

        Ok(ResolverConfig {
            cache_enabled: self.cache_enabled.unwrap_or(defaults.cache_enabled),
            request_timeout,
            accept_invalid_certs: self
                .accept_invalid_certs
                .unwrap_or(defaults.accept_invalid_certs),
            use_env_proxy: self.use_env_proxy.unwrap_or(defaults.use_env_proxy),
            base_url,
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        })
    }

    /// Creates a builder from the command-line arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        let mut builder = Self::new()
            .cache_enabled(true)
            .accept_invalid_certs(cli.insecure)
            .use_env_proxy(!cli.no_proxy);
        if let Some(secs) = cli.timeout {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(base_url) = &cli.base_url {
            builder = builder.base_url(base_url.clone());
        }
        builder
    }
}

impl TryFrom<&Cli> for ResolverConfig {
    type Error = Error;

    fn try_from(cli: &Cli) -> Result<Self> {
        ResolverConfigBuilder::from_cli(cli).build()
    }
}
