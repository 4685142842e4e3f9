//! `repofetch` is a library and command-line tool for reading repository
//! content from hosting services through their REST APIs, without cloning.
//!
//! Given a repository URL it can:
//! 1.  **List references** (`list_remote`): every branch and tag name.
//! 2.  **List a tree** (`list_tree`): every file path at a reference,
//!     optionally narrowed to a set of extensions.
//! 3.  **Resolve a commit** (`latest_commit_id`): the commit a reference points at.
//! 4.  **Download** (`download`): the repository content at a reference,
//!     unpacked into a local directory.
//!
//! Providers implement these operations for one hosting service each; the
//! built-in [`AzureProvider`] handles Azure DevOps. A [`Resolver`] picks the
//! provider matching a URL, so callers only ever deal with one object.
//! Reference lists and tree listings are cached per provider instance.
//!
//! # Example: Library Usage
//!
//! ```no_run
//! use repofetch::{CallContext, FetchOptions, RemoteProvider, Resolver, ResolverConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> repofetch::Result<()> {
//! let resolver = Resolver::with_defaults(&ResolverConfig::default(), None)?;
//! let ctx = CallContext::background().with_timeout(Duration::from_secs(30));
//!
//! let opts = FetchOptions::new(
//!     "https://org@dev.azure.com/org/proj/_git/repo",
//!     "refs/heads/main",
//! )
//! .with_credentials("", "my-personal-access-token")
//! .extensions([".yml"]);
//!
//! for path in resolver.list_tree(&ctx, &opts).await? {
//!     println!("{}", path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod azure;
pub mod cache;
pub mod cancellation;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core_types;
pub mod errors;
pub mod filtering;
pub mod http;
pub mod prelude;
pub mod progress;
pub mod provider;
pub mod reference;
pub mod signal;

// Re-export key public types for easier use as a library
pub use azure::AzureProvider;
pub use cancellation::{CallContext, CancellationToken};
pub use config::{ResolverConfig, ResolverConfigBuilder};
pub use core_types::{CloneOptions, FetchOptions};
pub use errors::{Error, ErrorKind, Result};
pub use provider::{RemoteProvider, Resolver};
