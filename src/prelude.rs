//! The `repofetch` prelude for convenient library usage.
//!
//! This module re-exports the most commonly used types and traits. By
//! importing everything from this prelude you get the resolver, the option
//! structs, cancellation and errors without full paths.
//!
//! # Example
//!
//! ```
//! use repofetch::prelude::*;
//! # fn main() -> Result<()> {
//!
//! let config = ResolverConfigBuilder::new().cache_enabled(false).build()?;
//! let resolver = Resolver::with_defaults(&config, None)?;
//! let token = CancellationToken::new();
//! let ctx = CallContext::with_token(token.clone());
//!
//! assert!(resolver.handles("https://dev.azure.com/org/proj/_git/repo"));
//! # let _ = ctx;
//! # Ok(())
//! # }
//! ```

pub use crate::archive::{ArchiveExtractor, ZipExtractor};
pub use crate::azure::{is_azure_url, parse_url, AzureProvider, RepositoryLocator};
pub use crate::cache::RepoCache;
pub use crate::cancellation::{CallContext, CancellationToken};
pub use crate::config::{ResolverConfig, ResolverConfigBuilder};
pub use crate::core_types::{CloneOptions, FetchOptions};
pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::filtering::{filter_paths, matches_extensions};
pub use crate::http::Credentials;
pub use crate::progress::{NoOpProgress, ProgressReporter};
pub use crate::provider::{RemoteProvider, Resolver};
pub use crate::reference::{format_reference_name, version_type, VersionType};
