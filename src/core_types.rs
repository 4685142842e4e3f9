//! Defines the call-scoped option structs accepted by every provider operation.
//!
//! These carry the repository URL, the reference, and credentials that take
//! precedence over any embedded in the URL.

use crate::http::Credentials;

/// Options for operations addressing a repository (and optionally one reference).
///
/// Used by `download`, `list_remote` and `remove_cache`.
///
/// # Examples
///
/// ```
/// use repofetch::core_types::CloneOptions;
///
/// let opts = CloneOptions::new("https://dev.azure.com/org/proj/_git/repo")
///     .reference_name("refs/heads/main")
///     .with_credentials("alice", "pat");
///
/// assert_eq!(opts.reference_name, "refs/heads/main");
/// assert!(!opts.credentials().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneOptions {
    /// The repository URL exactly as the caller supplied it.
    pub repository_url: String,
    /// The full reference name, e.g. `refs/heads/main`. Empty means the remote default.
    pub reference_name: String,
    /// Call-scoped username.
    pub username: String,
    /// Call-scoped password or token.
    pub password: String,
}

impl CloneOptions {
    pub fn new(repository_url: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            ..Default::default()
        }
    }

    pub fn reference_name(mut self, reference_name: impl Into<String>) -> Self {
        self.reference_name = reference_name.into();
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// The call-scoped credentials as a [`Credentials`] value.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

/// Options for read operations at a specific reference.
///
/// Used by `latest_commit_id` and `list_tree`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// The repository URL exactly as the caller supplied it.
    pub repository_url: String,
    /// The full reference name, e.g. `refs/heads/main`.
    pub reference_name: String,
    /// Call-scoped username.
    pub username: String,
    /// Call-scoped password or token.
    pub password: String,
    /// Suffixes a listed path must end with. Empty means no filtering.
    pub extensions: Vec<String>,
}

impl FetchOptions {
    pub fn new(repository_url: impl Into<String>, reference_name: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            reference_name: reference_name.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// The call-scoped credentials as a [`Credentials`] value.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    /// The repository-level options matching these fetch options.
    pub fn clone_options(&self) -> CloneOptions {
        CloneOptions {
            repository_url: self.repository_url.clone(),
            reference_name: self.reference_name.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}
