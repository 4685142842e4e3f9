//! Construction of Azure DevOps Git REST endpoints.
//!
//! See <https://learn.microsoft.com/en-us/rest/api/azure/devops/git/> for the
//! refs, items and trees resources addressed here.

use super::url::RepositoryLocator;
use crate::constants::API_VERSION;
use crate::errors::{Error, Result};
use crate::reference::{format_reference_name, version_type};
use url::Url;

/// Builds REST URLs relative to a configured API base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// `{base}/{org}/{project}/_apis/git/repositories/{repo}/{tail...}`, with
    /// every segment escaped on its own.
    fn repository_url(
        &self,
        locator: &RepositoryLocator,
        tail: &[&str],
        endpoint: &'static str,
    ) -> Result<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|source| Error::EndpointBuild { endpoint, source })?;
        url.path_segments_mut()
            .map_err(|_| Error::EndpointBuild {
                endpoint,
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .push(&locator.organization)
            .push(&locator.project)
            .extend(["_apis", "git", "repositories"])
            .push(&locator.repository)
            .extend(tail);
        Ok(url)
    }

    /// Lists the references of a repository.
    pub fn refs_url(&self, locator: &RepositoryLocator) -> Result<Url> {
        let mut url = self.repository_url(locator, &["refs"], "list refs")?;
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        Ok(url)
    }

    /// Fetches the root item (tree object id and commit id) at a reference.
    pub fn root_item_url(&self, locator: &RepositoryLocator, reference_name: &str) -> Result<Url> {
        let mut url = self.repository_url(locator, &["items"], "root item")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("scopePath", "/");
            append_version_descriptor(&mut query, reference_name);
            query.append_pair("api-version", API_VERSION);
        }
        Ok(url)
    }

    /// Lists a tree recursively by its object id.
    pub fn tree_url(&self, locator: &RepositoryLocator, object_id: &str) -> Result<Url> {
        let mut url = self.repository_url(locator, &["trees", object_id], "list tree")?;
        url.query_pairs_mut()
            .append_pair("recursive", "true")
            .append_pair("api-version", API_VERSION);
        Ok(url)
    }

    /// Downloads the whole repository content at a reference as a zip archive.
    pub fn download_url(&self, locator: &RepositoryLocator, reference_name: &str) -> Result<Url> {
        let mut url = self.repository_url(locator, &["items"], "download")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("scopePath", "/");
            query.append_pair("download", "true");
            append_version_descriptor(&mut query, reference_name);
            query.append_pair("$format", "zip");
            query.append_pair("recursionLevel", "full");
            query.append_pair("api-version", API_VERSION);
        }
        Ok(url)
    }
}

/// Adds `versionDescriptor.versionType` and `versionDescriptor.version`; an
/// empty reference leaves the remote's default branch in effect.
fn append_version_descriptor(
    query: &mut url::form_urlencoded::Serializer<'_, url::UrlQuery<'_>>,
    reference_name: &str,
) {
    if reference_name.is_empty() {
        return;
    }
    query.append_pair(
        "versionDescriptor.versionType",
        version_type(reference_name).as_str(),
    );
    query.append_pair(
        "versionDescriptor.version",
        format_reference_name(reference_name),
    );
}
