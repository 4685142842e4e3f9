//! Handles parsing of Azure DevOps repository URLs.

use crate::constants::{AZURE_DEVOPS_HOST, VISUAL_STUDIO_HOST_SUFFIX};
use crate::errors::{Error, Result};
use crate::http::{redact_url, Credentials};
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

const EXPECTED_SSH_URL: &str = "git@ssh.dev.azure.com:v3/Organisation/Project/Repository";
const EXPECTED_AZURE_DEVOPS_HTTP_URL: &str =
    "https://Organisation@dev.azure.com/Organisation/Project/_git/Repository";
const EXPECTED_VISUAL_STUDIO_HTTP_URL: &str =
    "https://organisation.visualstudio.com/project/_git/repository";

/// Regex for the scp-like SSH form: `user@host:v3/Org/Project/Repo`.
static SSH_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@/:]+@ssh\.[^/:]+:v3/([^/]+)/([^/]+)/([^/]+)$").unwrap());

/// The canonical coordinates of an Azure DevOps repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    pub organization: String,
    pub project: String,
    pub repository: String,
    /// Credentials embedded in the URL's userinfo, if any.
    pub embedded: Credentials,
}

/// Checks if a given string looks like an Azure DevOps repository URL.
///
/// This is a simple heuristic check used for provider dispatch; it does not
/// validate the URL's shape.
///
/// # Examples
/// ```
/// use repofetch::azure::is_azure_url;
///
/// assert!(is_azure_url("https://org@dev.azure.com/org/proj/_git/repo"));
/// assert!(is_azure_url("git@ssh.dev.azure.com:v3/org/proj/repo"));
/// assert!(is_azure_url("https://org.visualstudio.com/proj/_git/repo"));
/// assert!(!is_azure_url("https://github.com/user/repo.git"));
/// ```
pub fn is_azure_url(raw_url: &str) -> bool {
    raw_url.contains(AZURE_DEVOPS_HOST) || raw_url.contains(VISUAL_STUDIO_HOST_SUFFIX)
}

/// Parses an Azure DevOps repository URL into a [`RepositoryLocator`].
///
/// Supported shapes:
/// - `https://Organisation@dev.azure.com/Organisation/Project/_git/Repository`
/// - `https://organisation.visualstudio.com/project/_git/repository`
/// - `git@ssh.dev.azure.com:v3/Organisation/Project/Repository`
/// - `ssh://git@ssh.dev.azure.com:v3/Organisation/Project/Repository`
///
/// Parsing is strictly positional: a URL with any other number of path
/// segments is rejected rather than guessed at.
///
/// # Examples
/// ```
/// use repofetch::azure::parse_url;
///
/// let locator = parse_url("https://org@dev.azure.com/org/proj/_git/repo").unwrap();
/// assert_eq!(locator.organization, "org");
/// assert_eq!(locator.project, "proj");
/// assert_eq!(locator.repository, "repo");
/// assert_eq!(locator.embedded.username, "org");
///
/// assert!(parse_url("https://dev.azure.com/org/proj/repo").is_err());
/// ```
pub fn parse_url(raw_url: &str) -> Result<RepositoryLocator> {
    if raw_url.starts_with("https://") || raw_url.starts_with("http://") {
        return parse_http_url(raw_url);
    }
    if raw_url.starts_with("git@ssh") {
        return parse_ssh_url(raw_url, raw_url);
    }
    if let Some(rest) = raw_url.strip_prefix("ssh://") {
        return parse_ssh_url(raw_url, rest);
    }
    Err(Error::UrlParse(format!(
        "supported url schemes are https and ssh; received URL '{}'",
        redact_url(raw_url)
    )))
}

/// Matches `scp_form` (the URL without any `ssh://` prefix); `raw_url` is
/// only used for error messages.
fn parse_ssh_url(raw_url: &str, scp_form: &str) -> Result<RepositoryLocator> {
    let caps = SSH_URL_RE.captures(scp_form).ok_or_else(|| {
        Error::UrlParse(format!(
            "want url {}, got {}",
            EXPECTED_SSH_URL,
            redact_url(raw_url)
        ))
    })?;
    Ok(RepositoryLocator {
        organization: caps[1].to_string(),
        project: caps[2].to_string(),
        repository: caps[3].to_string(),
        embedded: Credentials::default(),
    })
}

fn parse_http_url(raw_url: &str) -> Result<RepositoryLocator> {
    let url = Url::parse(raw_url)
        .map_err(|e| {
            Error::UrlParse(format!(
                "failed to parse HTTP url '{}': {}",
                redact_url(raw_url),
                e
            ))
        })?;
    let host = url.host_str().unwrap_or_default();
    let segments: Vec<&str> = url.path().split('/').collect();

    let (organization, project, repository) = if host == AZURE_DEVOPS_HOST {
        // ["", org, project, "_git", repo]
        match segments.as_slice() {
            ["", org, project, "_git", repo] if all_present(&[org, project, repo]) => {
                (*org, *project, *repo)
            }
            _ => {
                return Err(Error::UrlParse(format!(
                    "want url {}, got {}",
                    EXPECTED_AZURE_DEVOPS_HTTP_URL,
                    redact_url(raw_url)
                )))
            }
        }
    } else if let Some(org) = host.strip_suffix(VISUAL_STUDIO_HOST_SUFFIX) {
        // ["", project, "_git", repo]
        match segments.as_slice() {
            ["", project, "_git", repo] if all_present(&[&org, project, repo]) => {
                (org, *project, *repo)
            }
            _ => {
                return Err(Error::UrlParse(format!(
                    "want url {}, got {}",
                    EXPECTED_VISUAL_STUDIO_HTTP_URL,
                    redact_url(raw_url)
                )))
            }
        }
    } else {
        return Err(Error::UrlParse(format!(
            "unknown azure host in url \"{}\"",
            redact_url(raw_url)
        )));
    };

    Ok(RepositoryLocator {
        organization: decode_segment(organization),
        project: decode_segment(project),
        repository: decode_segment(repository),
        embedded: Credentials::new(
            decode_segment(url.username()),
            decode_segment(url.password().unwrap_or_default()),
        ),
    })
}

fn all_present(parts: &[&&str]) -> bool {
    parts.iter().all(|p| !p.is_empty())
}

/// `Url` keeps path segments and userinfo percent-encoded; the locator holds
/// them decoded so the endpoint builder escapes them exactly once.
fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
