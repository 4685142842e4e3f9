//! Classification of git reference names.
//!
//! Hosting APIs address content with a "version descriptor" made of a type
//! (branch, tag or commit) and a bare name. Both are derived from the full
//! reference name by a fixed prefix convention.

use std::fmt;

/// Prefix of fully-qualified branch references.
pub const BRANCH_PREFIX: &str = "refs/heads/";
/// Prefix of fully-qualified tag references.
pub const TAG_PREFIX: &str = "refs/tags/";

/// The kind of version a reference name designates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionType {
    Branch,
    Tag,
    /// Anything without a branch or tag prefix, typically a commit id.
    Commit,
}

impl VersionType {
    /// The value the REST API expects for this version type.
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionType::Branch => "branch",
            VersionType::Tag => "tag",
            VersionType::Commit => "commit",
        }
    }
}

impl fmt::Display for VersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a reference name by its prefix.
///
/// # Examples
/// ```
/// use repofetch::reference::{version_type, VersionType};
///
/// assert_eq!(version_type("refs/heads/main"), VersionType::Branch);
/// assert_eq!(version_type("refs/tags/v1"), VersionType::Tag);
/// assert_eq!(version_type("a1b2c3d"), VersionType::Commit);
/// ```
pub fn version_type(name: &str) -> VersionType {
    if name.starts_with(BRANCH_PREFIX) {
        VersionType::Branch
    } else if name.starts_with(TAG_PREFIX) {
        VersionType::Tag
    } else {
        VersionType::Commit
    }
}

/// Strips the branch or tag prefix from a reference name.
///
/// Names without either prefix are returned unchanged.
///
/// # Examples
/// ```
/// use repofetch::reference::format_reference_name;
///
/// assert_eq!(format_reference_name("refs/heads/main"), "main");
/// assert_eq!(format_reference_name("refs/tags/v1"), "v1");
/// assert_eq!(format_reference_name("a1b2c3d"), "a1b2c3d");
/// ```
pub fn format_reference_name(name: &str) -> &str {
    name.strip_prefix(BRANCH_PREFIX)
        .or_else(|| name.strip_prefix(TAG_PREFIX))
        .unwrap_or(name)
}
