// src/azure/mod.rs
//! Resolves repository content hosted on Azure DevOps through its REST API.
//!
//! This module provides functionality to:
//! - Parse the HTTPS and SSH URL dialects Azure DevOps hands out.
//! - List references and recursive trees without cloning.
//! - Download a repository snapshot as a zip archive and unpack it.
//! - Cache reference lists and tree listings per provider instance.

mod api;
mod endpoints;
mod url;

pub use api::RootItem;
pub use endpoints::Endpoints;
pub use self::url::{is_azure_url, parse_url, RepositoryLocator};

use crate::archive::{create_temp_archive, ArchiveExtractor, ZipExtractor};
use crate::cache::RepoCache;
use crate::cancellation::CallContext;
use crate::config::ResolverConfig;
use crate::core_types::{CloneOptions, FetchOptions};
use crate::errors::{io_error, Error, Result};
use crate::filtering::filter_paths;
use crate::http::{redact_url, Credentials, RestClient};
use crate::progress::ProgressReporter;
use crate::provider::RemoteProvider;
use api::RemoteRepo;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// [`RemoteProvider`] for `dev.azure.com` and `*.visualstudio.com` repositories.
///
/// Each instance owns its cache; share one instance (e.g. behind an `Arc`)
/// to share cached listings between callers.
pub struct AzureProvider {
    client: RestClient,
    endpoints: Endpoints,
    cache: RepoCache,
    extractor: Arc<dyn ArchiveExtractor>,
    progress: Option<Arc<dyn ProgressReporter>>,
}

impl AzureProvider {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        Ok(Self {
            client: RestClient::new(config)?,
            endpoints: Endpoints::new(config.base_url.clone()),
            cache: RepoCache::new(config.cache_enabled),
            extractor: Arc::new(ZipExtractor),
            progress: None,
        })
    }

    /// Replaces the zip extractor used by [`RemoteProvider::download`].
    pub fn with_extractor(mut self, extractor: Arc<dyn ArchiveExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Reports download progress to `progress`.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// The cache of this provider.
    pub fn cache(&self) -> &RepoCache {
        &self.cache
    }

    fn remote<'a>(
        &'a self,
        locator: &'a RepositoryLocator,
        call_credentials: &'a Credentials,
    ) -> RemoteRepo<'a> {
        RemoteRepo {
            client: &self.client,
            endpoints: &self.endpoints,
            locator,
            credentials: Credentials::select(call_credentials, &locator.embedded),
        }
    }

    /// Fetches the reference list and records it under `repository_url`.
    async fn fetch_refs(
        &self,
        ctx: &CallContext,
        remote: &RemoteRepo<'_>,
        repository_url: &str,
    ) -> Result<Vec<String>> {
        let refs = remote.list_refs(ctx).await?;
        log::debug!("{} lists {} references", redact_url(repository_url), refs.len());
        self.cache.set_refs(repository_url, refs.clone());
        Ok(refs)
    }
}

#[async_trait]
impl RemoteProvider for AzureProvider {
    fn name(&self) -> &'static str {
        "azure"
    }

    fn handles(&self, repository_url: &str) -> bool {
        is_azure_url(repository_url)
    }

    async fn download(&self, ctx: &CallContext, destination: &Path, opts: &CloneOptions) -> Result<()> {
        let locator = parse_url(&opts.repository_url)?;
        let credentials = opts.credentials();
        let remote = self.remote(&locator, &credentials);
        ctx.check("download zip")?;

        // Removed on drop, whichever way this function returns.
        let archive = create_temp_archive()?;
        let std_file = archive
            .reopen()
            .map_err(|e| io_error(e, "open temp file"))?;
        let mut file = tokio::fs::File::from_std(std_file);
        let size = remote
            .download_zip(ctx, &opts.reference_name, &mut file, self.progress.as_ref())
            .await?;
        drop(file);
        log::debug!(
            "Saved {} bytes of {} to {}",
            size,
            redact_url(&opts.repository_url),
            archive.path().display()
        );

        ctx.check("extract zip")?;
        let extractor = Arc::clone(&self.extractor);
        let archive_path = archive.path().to_path_buf();
        let target = destination.to_path_buf();
        tokio::task::spawn_blocking(move || extractor.extract(&archive_path, &target))
            .await
            .map_err(|e| Error::Extraction(anyhow::anyhow!("extraction task failed: {}", e)))?
            .map_err(Error::Extraction)?;

        log::info!(
            "Downloaded {} at '{}' into {}",
            locator.repository,
            opts.reference_name,
            destination.display()
        );
        Ok(())
    }

    async fn latest_commit_id(&self, ctx: &CallContext, opts: &FetchOptions) -> Result<String> {
        let locator = parse_url(&opts.repository_url)?;
        let credentials = opts.credentials();
        let item = self
            .remote(&locator, &credentials)
            .get_root_item(ctx, &opts.reference_name)
            .await?;
        log::debug!(
            "{} at '{}' is {}",
            redact_url(&opts.repository_url),
            opts.reference_name,
            item.commit_id
        );
        Ok(item.commit_id)
    }

    async fn list_remote(&self, ctx: &CallContext, opts: &CloneOptions) -> Result<Vec<String>> {
        let locator = parse_url(&opts.repository_url)?;
        let credentials = opts.credentials();
        let remote = self.remote(&locator, &credentials);
        self.fetch_refs(ctx, &remote, &opts.repository_url).await
    }

    async fn list_tree(&self, ctx: &CallContext, opts: &FetchOptions) -> Result<Vec<String>> {
        let locator = parse_url(&opts.repository_url)?;
        let url = opts.repository_url.as_str();
        let reference = opts.reference_name.as_str();

        if let Some(paths) = self.cache.get_tree(url, reference) {
            log::debug!("Tree cache hit for {} at '{}'", redact_url(url), reference);
            return Ok(filter_paths(&paths, &opts.extensions));
        }

        let credentials = opts.credentials();
        let remote = self.remote(&locator, &credentials);

        let refs = match self.cache.get_refs(url) {
            Some(refs) => {
                log::debug!("Reference cache hit for {}", redact_url(url));
                refs
            }
            None => self.fetch_refs(ctx, &remote, url).await?,
        };
        if !refs.iter().any(|r| r == reference) {
            return Err(Error::ReferenceNotFound {
                name: reference.to_string(),
            });
        }

        let root = remote.get_root_item(ctx, reference).await?;
        let paths = remote.list_tree_paths(ctx, &root.object_id).await?;
        log::debug!(
            "{} at '{}' has {} tree entries",
            redact_url(url),
            reference,
            paths.len()
        );
        let filtered = filter_paths(&paths, &opts.extensions);
        self.cache.set_tree(url, reference, paths);
        Ok(filtered)
    }

    fn remove_cache(&self, opts: &CloneOptions) {
        self.cache
            .invalidate(&opts.repository_url, &opts.reference_name);
    }
}
