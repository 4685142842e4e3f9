// src/progress.rs

//! Defines a trait for reporting progress while streaming repository archives.
#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// A trait for reporting transfer progress, abstracting over specific
/// implementations like `indicatif`.
///
/// Lengths and positions are byte counts of the archive being downloaded.
/// The length is only set when the remote announces a `Content-Length`.
///
/// # Examples
///
/// ```
/// use repofetch::progress::ProgressReporter;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// // A mock reporter that remembers how many bytes were received.
/// struct ByteCounter {
///     received: AtomicU64,
/// }
/// impl ProgressReporter for ByteCounter {
///     fn set_length(&self, _len: u64) {}
///     fn set_position(&self, pos: u64) {
///         self.received.store(pos, Ordering::SeqCst);
///     }
///     fn set_message(&self, _msg: String) {}
///     fn finish_with_message(&self, _msg: String) {}
/// }
///
/// let reporter = ByteCounter { received: AtomicU64::new(0) };
/// reporter.set_position(4096);
/// assert_eq!(reporter.received.load(Ordering::SeqCst), 4096);
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Sets the total number of bytes expected.
    fn set_length(&self, len: u64);
    /// Sets the number of bytes received so far.
    fn set_position(&self, pos: u64);
    /// Sets a descriptive message for the current operation (e.g., "Downloading...").
    fn set_message(&self, msg: String);
    /// Finishes the progress reporting with a final message.
    fn finish_with_message(&self, msg: String);
}

/// A `ProgressReporter` that does nothing.
///
/// This is used as a default or in non-interactive environments where a progress
/// bar is not desired.
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn set_length(&self, _len: u64) {}
    fn set_position(&self, _pos: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish_with_message(&self, _msg: String) {}
}

/// An implementation of `ProgressReporter` using the `indicatif` crate.
#[cfg(feature = "progress")]
#[derive(Clone)]
pub struct IndicatifProgress {
    bar: ProgressBar,
}

#[cfg(feature = "progress")]
impl IndicatifProgress {
    /// Creates a new byte-oriented progress bar writing to stderr.
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        // The template is a compile-time constant; fall back to the default
        // style rather than failing a download over cosmetics.
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        Self { bar: pb }
    }
}

#[cfg(feature = "progress")]
impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "progress")]
impl ProgressReporter for IndicatifProgress {
    fn set_length(&self, len: u64) {
        self.bar.set_length(len);
    }

    fn set_position(&self, pos: u64) {
        self.bar.set_position(pos);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish_with_message(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}
