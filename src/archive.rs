//! Archive extraction and temporary archive storage.
//!
//! Downloads land in a named temporary file that is removed when its handle
//! is dropped, whatever the outcome of the download or the extraction.

use crate::constants::ARCHIVE_TEMP_PREFIX;
use crate::errors::{io_error, Result};
use anyhow::Context;
use std::fs::{self, File};
use std::path::Path;
use tempfile::NamedTempFile;

/// Unpacks an archive file into a destination directory.
///
/// Implementations are synchronous; providers run them on a blocking thread.
/// Partial output left behind by a failed extraction is not rolled back.
pub trait ArchiveExtractor: Send + Sync {
    fn extract(&self, archive_path: &Path, destination: &Path) -> anyhow::Result<()>;
}

/// Extracts zip archives with the `zip` crate.
///
/// Entry names that would escape the destination (absolute paths, `..`) are
/// skipped by the `zip` crate's own sanitisation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive_path: &Path, destination: &Path) -> anyhow::Result<()> {
        let file = File::open(archive_path)
            .with_context(|| format!("Failed to open archive '{}'", archive_path.display()))?;
        let mut archive = zip::ZipArchive::new(file)
            .with_context(|| format!("'{}' is not a valid zip archive", archive_path.display()))?;
        fs::create_dir_all(destination).with_context(|| {
            format!(
                "Failed to create destination directory '{}'",
                destination.display()
            )
        })?;
        archive.extract(destination).with_context(|| {
            format!(
                "Failed to extract {} entries into '{}'",
                archive.len(),
                destination.display()
            )
        })?;
        log::debug!(
            "Extracted {} entries into {}",
            archive.len(),
            destination.display()
        );
        Ok(())
    }
}

/// Creates the temporary file a downloaded archive is streamed into.
pub fn create_temp_archive() -> Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(ARCHIVE_TEMP_PREFIX)
        .suffix(".zip")
        .tempfile()
        .map_err(|e| io_error(e, "create temp file"))
}
