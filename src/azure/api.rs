// src/azure/api.rs
//! Remote calls against the Azure DevOps Git REST API and their payloads.

use super::endpoints::Endpoints;
use super::url::RepositoryLocator;
use crate::cancellation::CallContext;
use crate::errors::{io_error, Error, Result};
use crate::http::{Credentials, RestClient};
use crate::progress::ProgressReporter;
use serde::Deserialize;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// The symbolic reference excluded from reference listings.
const HEAD: &str = "HEAD";

/// Envelope of list responses: `{"count": n, "value": [...]}`.
#[derive(Deserialize, Debug)]
struct ValueList<T> {
    #[serde(alias = "Value", default = "Vec::new")]
    value: Vec<T>,
}

/// A reference from the refs resource.
#[derive(Deserialize, Debug)]
struct GitRef {
    name: String,
}

/// The tree root and commit of a repository at a reference.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RootItem {
    #[serde(default)]
    pub object_id: String,
    #[serde(default)]
    pub commit_id: String,
    #[serde(default)]
    pub path: String,
}

/// Payload of the trees resource.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Tree {
    #[serde(default)]
    tree_entries: Vec<TreeEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TreeEntry {
    relative_path: String,
}

/// One repository on the remote, with everything needed to call it.
pub(super) struct RemoteRepo<'a> {
    pub client: &'a RestClient,
    pub endpoints: &'a Endpoints,
    pub locator: &'a RepositoryLocator,
    /// The credentials selected for this call, if any.
    pub credentials: Option<&'a Credentials>,
}

impl RemoteRepo<'_> {
    /// Lists the reference names of the repository, without `HEAD`.
    pub async fn list_refs(&self, ctx: &CallContext) -> Result<Vec<String>> {
        let url = self.endpoints.refs_url(self.locator)?;
        let refs: ValueList<GitRef> = self
            .client
            .get_json(ctx, &url, self.credentials, "list refs", "Azure refs")
            .await?;
        Ok(refs
            .value
            .into_iter()
            .map(|r| r.name)
            .filter(|name| name != HEAD)
            .collect())
    }

    /// Resolves the root item of the repository at a reference.
    ///
    /// # Errors
    /// [`Error::IncompleteData`] when the remote returns no item or an item
    /// without a commit id.
    pub async fn get_root_item(&self, ctx: &CallContext, reference_name: &str) -> Result<RootItem> {
        let url = self.endpoints.root_item_url(self.locator, reference_name)?;
        let items: ValueList<RootItem> = self
            .client
            .get_json(
                ctx,
                &url,
                self.credentials,
                "get repository root item",
                "Azure items",
            )
            .await?;
        match items.value.into_iter().next() {
            Some(item) if !item.commit_id.is_empty() => Ok(item),
            _ => Err(Error::IncompleteData(format!(
                "failed to get latest commit ID of '{}' at '{}'",
                self.locator.repository, reference_name
            ))),
        }
    }

    /// Lists every path below a tree object, recursively.
    pub async fn list_tree_paths(&self, ctx: &CallContext, object_id: &str) -> Result<Vec<String>> {
        let url = self.endpoints.tree_url(self.locator, object_id)?;
        let tree: Tree = self
            .client
            .get_json(ctx, &url, self.credentials, "list tree", "Azure tree")
            .await?;
        Ok(tree
            .tree_entries
            .into_iter()
            .map(|e| e.relative_path)
            .collect())
    }

    /// Streams the zip snapshot of the repository at a reference into `file`.
    ///
    /// Returns the number of bytes written.
    pub async fn download_zip(
        &self,
        ctx: &CallContext,
        reference_name: &str,
        file: &mut tokio::fs::File,
        progress: Option<&Arc<dyn ProgressReporter>>,
    ) -> Result<u64> {
        const STEP: &str = "download zip";
        let url = self.endpoints.download_url(self.locator, reference_name)?;
        let mut response = self.client.get(ctx, &url, self.credentials, STEP).await?;

        if let Some(p) = progress {
            if let Some(len) = response.content_length() {
                p.set_length(len);
            }
            p.set_message(format!("Downloading {}...", self.locator.repository));
        }

        let mut written: u64 = 0;
        loop {
            let chunk = ctx
                .run(STEP, async {
                    response
                        .chunk()
                        .await
                        .map_err(|source| Error::Transport { step: STEP, source })
                })
                .await?;
            let Some(chunk) = chunk else { break };
            file.write_all(&chunk)
                .await
                .map_err(|e| io_error(e, "save HTTP response to a file"))?;
            written += chunk.len() as u64;
            if let Some(p) = progress {
                p.set_position(written);
            }
        }
        file.flush()
            .await
            .map_err(|e| io_error(e, "save HTTP response to a file"))?;

        if let Some(p) = progress {
            p.finish_with_message(format!("Downloaded {}", self.locator.repository));
        }
        Ok(written)
    }
}
