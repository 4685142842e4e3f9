//! Defines the error types surfaced by every resolver operation.
//!
//! The `Error` enum names the step that failed (parse, endpoint build, remote
//! call, decode, extraction) and `Error::kind` folds it into the coarse
//! `ErrorKind` a caller needs to decide what to tell the user.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while resolving repository content over a hosting REST API.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    // --- URL Errors ---
    /// The URL scheme, host or path shape is not one the provider understands.
    #[error("Failed to parse repository URL: {0}")]
    UrlParse(String),

    /// No registered provider (and no fallback) accepts the URL.
    #[error("No provider is able to handle repository URL '{0}'")]
    UnsupportedUrl(String),

    /// A REST endpoint could not be constructed from the configured base URL.
    #[error("Failed to build {endpoint} URL: {source}")]
    EndpointBuild {
        /// The endpoint being built (e.g. "list refs").
        endpoint: &'static str,
        /// The underlying URL parse failure.
        #[source]
        source: url::ParseError,
    },

    // --- Remote Errors ---
    /// The remote rejected the supplied credentials (HTTP 401 or 203).
    #[error("Authentication failed while trying to {step}")]
    AuthenticationFailure {
        /// The step that was being performed.
        step: &'static str,
    },

    /// The remote does not know the repository (HTTP 404).
    #[error("Repository not found or repository URL is incorrect (while trying to {step})")]
    RepositoryNotFound {
        /// The step that was being performed.
        step: &'static str,
    },

    /// The requested reference is not present in the remote reference list.
    #[error("Reference '{name}' was not found on the remote")]
    ReferenceNotFound {
        /// The reference name as requested by the caller.
        name: String,
    },

    /// Any other non-success HTTP status.
    #[error("Failed to {step} with a status \"{status}\"")]
    UnexpectedStatus {
        /// The step that was being performed.
        step: &'static str,
        /// The status returned by the remote.
        status: StatusCode,
    },

    /// The HTTP request could not be sent or its body could not be read.
    #[error("Failed to {step}: {source}")]
    Transport {
        /// The step that was being performed.
        step: &'static str,
        /// The underlying `reqwest::Error`.
        #[source]
        source: reqwest::Error,
    },

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// The caller's deadline elapsed before the operation completed.
    #[error("Operation timed out while trying to {step}")]
    Timeout {
        /// The step that was being performed.
        step: &'static str,
    },

    // --- Payload Errors ---
    /// The response body was not the JSON shape expected for the endpoint.
    #[error("Could not parse {what} response: {source}")]
    Decode {
        /// Which payload was being decoded (e.g. "refs").
        what: &'static str,
        /// The underlying `serde_json::Error`.
        #[source]
        source: serde_json::Error,
    },

    /// The remote answered successfully but without the data needed to continue.
    #[error("Incomplete data from remote: {0}")]
    IncompleteData(String),

    // --- Local Errors ---
    /// I/O failure on local storage (temp file, stream copy).
    #[error("I/O error while trying to {step}: {source}")]
    Io {
        /// The step that was being performed.
        step: &'static str,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    /// The archive extractor failed.
    #[error("Failed to extract archive: {0}")]
    Extraction(#[source] anyhow::Error),

    /// The HTTP client could not be constructed from the configuration.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Invalid configuration settings.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification of an [`Error`], stable across variants.
///
/// Lets callers tell "fix your URL" from "fix your credentials" from "that
/// reference does not exist" from "transient remote problem" without
/// inspecting error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The repository URL or the resolver configuration (including the HTTP
    /// client built from it) is unusable. Retrying does not help.
    InvalidUrl,
    /// Credentials were rejected.
    Authentication,
    /// The repository or the requested reference does not exist.
    NotFound,
    /// Transport failure, cancellation, timeout or unexpected status.
    Remote,
    /// The remote payload could not be decoded.
    MalformedResponse,
    /// The remote payload lacked required data.
    IncompleteData,
    /// Local storage or extraction failure.
    Io,
}

impl Error {
    /// Maps a non-success status code to the matching error for `step`.
    ///
    /// 404 is a missing repository, 401 and 203 (the provider's answer to an
    /// anonymous request against a private organization) are authentication
    /// failures, everything else is an unexpected status.
    ///
    /// # Examples
    /// ```
    /// use repofetch::errors::{Error, ErrorKind};
    /// use reqwest::StatusCode;
    ///
    /// let err = Error::from_status(StatusCode::NOT_FOUND, "list refs");
    /// assert_eq!(err.kind(), ErrorKind::NotFound);
    ///
    /// let err = Error::from_status(StatusCode::NON_AUTHORITATIVE_INFORMATION, "list refs");
    /// assert_eq!(err.kind(), ErrorKind::Authentication);
    /// ```
    pub fn from_status(status: StatusCode, step: &'static str) -> Self {
        match status {
            StatusCode::NOT_FOUND => Error::RepositoryNotFound { step },
            StatusCode::UNAUTHORIZED | StatusCode::NON_AUTHORITATIVE_INFORMATION => {
                Error::AuthenticationFailure { step }
            }
            status => Error::UnexpectedStatus { step, status },
        }
    }

    /// Returns the coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UrlParse(_)
            | Error::UnsupportedUrl(_)
            | Error::EndpointBuild { .. }
            | Error::ClientBuild(_)
            | Error::Config(_) => ErrorKind::InvalidUrl,
            Error::AuthenticationFailure { .. } => ErrorKind::Authentication,
            Error::RepositoryNotFound { .. } | Error::ReferenceNotFound { .. } => {
                ErrorKind::NotFound
            }
            Error::UnexpectedStatus { .. }
            | Error::Transport { .. }
            | Error::Cancelled
            | Error::Timeout { .. } => ErrorKind::Remote,
            Error::Decode { .. } => ErrorKind::MalformedResponse,
            Error::IncompleteData(_) => ErrorKind::IncompleteData,
            Error::Io { .. } | Error::Extraction(_) => ErrorKind::Io,
        }
    }
}

/// Helper function to create an `Error::Io` tagged with the failing step.
pub fn io_error(source: std::io::Error, step: &'static str) -> Error {
    Error::Io { step, source }
}
