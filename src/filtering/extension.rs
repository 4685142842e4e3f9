// src/filtering/extension.rs

/// Checks if a tree path passes the extension filter.
///
/// The filtering logic follows these rules:
///
/// 1.  **No Filter:** An empty extension list accepts every path.
/// 2.  **Suffix Match:** Otherwise the path must end with at least one of the
///     listed extensions.
///
/// The comparison is case-sensitive and purely textual, so an entry may be a
/// bare extension (`.yml`), a compound one (`.tar.gz`) or a full file name.
///
/// # Examples
///
/// ```
/// use repofetch::filtering::matches_extensions;
///
/// let exts = vec![".yml".to_string(), ".yaml".to_string()];
/// assert!(matches_extensions("/deploy/stack.yml", &exts));
/// assert!(!matches_extensions("/deploy/stack.YML", &exts)); // case-sensitive
/// assert!(!matches_extensions("/README.md", &exts));
///
/// // No filter accepts everything.
/// assert!(matches_extensions::<String>("/README.md", &[]));
/// ```
pub fn matches_extensions<S: AsRef<str>>(path: &str, extensions: &[S]) -> bool {
    extensions.is_empty() || extensions.iter().any(|ext| path.ends_with(ext.as_ref()))
}

/// Returns the paths from `paths` that pass [`matches_extensions`], preserving order.
pub fn filter_paths<S: AsRef<str>>(paths: &[String], extensions: &[S]) -> Vec<String> {
    paths
        .iter()
        .filter(|path| matches_extensions(path, extensions))
        .cloned()
        .collect()
}
