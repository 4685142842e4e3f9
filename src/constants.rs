// src/constants.rs

use std::time::Duration;

/// REST API version sent with every request, shared by all endpoint builders.
pub const API_VERSION: &str = "6.0";

/// Default base URL of the Azure DevOps REST API.
pub const AZURE_DEFAULT_BASE_URL: &str = "https://dev.azure.com";

/// Host of Azure DevOps organization URLs.
pub const AZURE_DEVOPS_HOST: &str = "dev.azure.com";

/// Host suffix of legacy per-organization Visual Studio URLs.
pub const VISUAL_STUDIO_HOST_SUFFIX: &str = ".visualstudio.com";

/// Overall per-request timeout applied by the HTTP client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// User agent announced to hosting APIs.
pub const DEFAULT_USER_AGENT: &str = concat!("repofetch/", env!("CARGO_PKG_VERSION"));

/// Prefix of the temporary archive file created during downloads.
pub const ARCHIVE_TEMP_PREFIX: &str = "azure-git-repo-";
