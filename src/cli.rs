// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Resolve, list and download remote git repository content through hosting REST APIs.
///
/// repofetch talks to the hosting provider's REST API instead of running a full
/// git clone: it lists references, resolves the latest commit of a branch or
/// tag, lists the files of a tree (optionally filtered by extension) and
/// downloads a snapshot of the repository as an archive extracted locally.
#[derive(Parser, Debug)]
#[command(name = "repofetch", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    // --- Credentials ---
    /// Username for basic authentication. Overrides credentials embedded in the URL.
    #[arg(short = 'u', long, env = "REPOFETCH_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password or personal access token for basic authentication.
    #[arg(
        short = 'p',
        long,
        env = "REPOFETCH_PASSWORD",
        hide_env_values = true,
        global = true
    )]
    pub password: Option<String>,

    // --- Transport Options ---
    /// Timeout in seconds for each HTTP request (default: 300).
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Do not verify TLS certificates of the remote.
    #[arg(short = 'k', long, action = clap::ArgAction::SetTrue, global = true)]
    pub insecure: bool,

    /// Ignore proxy settings from the environment.
    #[arg(long, action = clap::ArgAction::SetTrue, global = true)]
    pub no_proxy: bool,

    /// Base URL of the hosting REST API (for on-premises servers).
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// The operations exposed by the command line.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List the references (branches and tags) of a remote repository.
    LsRemote {
        /// Repository URL.
        url: String,
    },
    /// List the files of a repository at a reference.
    Tree {
        /// Repository URL.
        url: String,
        /// Reference to list, e.g. `refs/heads/main`.
        #[arg(short = 'r', long = "ref", value_name = "REF")]
        reference: String,
        /// Only list paths ending with these extensions (case-sensitive, repeatable).
        #[arg(short = 'e', long = "ext", value_name = "EXT", num_args = 1..)]
        extensions: Vec<String>,
    },
    /// Print the latest commit id reachable from a reference.
    Commit {
        /// Repository URL.
        url: String,
        /// Reference to resolve, e.g. `refs/tags/v1.0`.
        #[arg(short = 'r', long = "ref", value_name = "REF")]
        reference: String,
    },
    /// Download the repository content at a reference into a directory.
    Download {
        /// Repository URL.
        url: String,
        /// Destination directory.
        destination: PathBuf,
        /// Reference to download. Defaults to the repository's default branch.
        #[arg(short = 'r', long = "ref", value_name = "REF")]
        reference: Option<String>,
    },
}

impl Commands {
    /// The repository URL targeted by the command.
    pub fn url(&self) -> &str {
        match self {
            Commands::LsRemote { url }
            | Commands::Tree { url, .. }
            | Commands::Commit { url, .. }
            | Commands::Download { url, .. } => url,
        }
    }
}
