//! The provider contract and the resolver that dispatches between providers.
//!
//! A provider answers repository queries for one family of hosting URLs. The
//! [`Resolver`] picks the provider for a URL once, at the boundary, so callers
//! never need to know which hosting service a repository lives on.

use crate::azure::AzureProvider;
use crate::cancellation::CallContext;
use crate::config::ResolverConfig;
use crate::core_types::{CloneOptions, FetchOptions};
use crate::errors::{Error, Result};
use crate::http::redact_url;
use crate::progress::ProgressReporter;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Remote repository operations implemented by every hosting provider.
///
/// All operations may be called concurrently from many tasks on a shared
/// provider. Every network call honours the cancellation token and deadline
/// of the supplied [`CallContext`].
#[async_trait]
pub trait RemoteProvider: Send + Sync {
    /// A short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this provider understands `repository_url`.
    fn handles(&self, repository_url: &str) -> bool;

    /// Downloads the repository content at `opts.reference_name` and unpacks
    /// it into `destination`.
    async fn download(&self, ctx: &CallContext, destination: &Path, opts: &CloneOptions) -> Result<()>;

    /// Returns the commit id the reference currently points at.
    async fn latest_commit_id(&self, ctx: &CallContext, opts: &FetchOptions) -> Result<String>;

    /// Lists the reference names of the repository.
    async fn list_remote(&self, ctx: &CallContext, opts: &CloneOptions) -> Result<Vec<String>>;

    /// Lists the file paths of the repository at a reference, narrowed to
    /// `opts.extensions` when non-empty.
    async fn list_tree(&self, ctx: &CallContext, opts: &FetchOptions) -> Result<Vec<String>>;

    /// Drops cached state for the repository and the given reference.
    fn remove_cache(&self, opts: &CloneOptions);
}

/// Dispatches every operation to the first registered provider that handles
/// the repository URL, then to the fallback provider if one is set.
///
/// # Examples
///
/// ```
/// use repofetch::{Error, RemoteProvider, Resolver, ResolverConfig};
///
/// let resolver = Resolver::with_defaults(&ResolverConfig::default(), None).unwrap();
/// assert_eq!(
///     resolver
///         .provider_for("https://dev.azure.com/org/proj/_git/repo")
///         .unwrap()
///         .name(),
///     "azure"
/// );
/// assert!(matches!(
///     resolver.provider_for("https://github.com/user/repo.git"),
///     Err(Error::UnsupportedUrl(_))
/// ));
/// ```
#[derive(Default, Clone)]
pub struct Resolver {
    providers: Vec<Arc<dyn RemoteProvider>>,
    fallback: Option<Arc<dyn RemoteProvider>>,
}

impl Resolver {
    /// An empty resolver; every URL is unsupported until a provider is registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver with the built-in providers configured from `config`.
    pub fn with_defaults(
        config: &ResolverConfig,
        progress: Option<Arc<dyn ProgressReporter>>,
    ) -> Result<Self> {
        let mut azure = AzureProvider::new(config)?;
        if let Some(progress) = progress {
            azure = azure.with_progress(progress);
        }
        Ok(Self::new().register(Arc::new(azure)))
    }

    /// Appends a provider. Earlier registrations win when several match.
    pub fn register(mut self, provider: Arc<dyn RemoteProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Sets the provider used for URLs no registered provider handles, such
    /// as a native git protocol backend.
    pub fn with_fallback(mut self, provider: Arc<dyn RemoteProvider>) -> Self {
        self.fallback = Some(provider);
        self
    }

    /// Selects the provider for `repository_url`.
    pub fn provider_for(&self, repository_url: &str) -> Result<&dyn RemoteProvider> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.handles(repository_url))
            .or(self.fallback.as_ref())
            .ok_or_else(|| Error::UnsupportedUrl(redact_url(repository_url).into_owned()))?;
        log::debug!(
            "Using '{}' provider for {}",
            provider.name(),
            redact_url(repository_url)
        );
        Ok(&**provider)
    }
}

#[async_trait]
impl RemoteProvider for Resolver {
    fn name(&self) -> &'static str {
        "resolver"
    }

    fn handles(&self, repository_url: &str) -> bool {
        self.fallback.is_some() || self.providers.iter().any(|p| p.handles(repository_url))
    }

    async fn download(&self, ctx: &CallContext, destination: &Path, opts: &CloneOptions) -> Result<()> {
        self.provider_for(&opts.repository_url)?
            .download(ctx, destination, opts)
            .await
    }

    async fn latest_commit_id(&self, ctx: &CallContext, opts: &FetchOptions) -> Result<String> {
        self.provider_for(&opts.repository_url)?
            .latest_commit_id(ctx, opts)
            .await
    }

    async fn list_remote(&self, ctx: &CallContext, opts: &CloneOptions) -> Result<Vec<String>> {
        self.provider_for(&opts.repository_url)?
            .list_remote(ctx, opts)
            .await
    }

    async fn list_tree(&self, ctx: &CallContext, opts: &FetchOptions) -> Result<Vec<String>> {
        self.provider_for(&opts.repository_url)?
            .list_tree(ctx, opts)
            .await
    }

    fn remove_cache(&self, opts: &CloneOptions) {
        match self.provider_for(&opts.repository_url) {
            Ok(provider) => provider.remove_cache(opts),
            Err(_) => log::debug!("No provider caches {}", redact_url(&opts.repository_url)),
        }
    }
}
