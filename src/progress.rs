//! Progress-callback trait for upload events.
//!
//! Inject an [`Arc<dyn UploadProgressCallback>`] via
//! [`crate::config::UploadConfigBuilder::progress_callback`] to observe the
//! orchestrator: each attempt, naming conflicts, the PDF commit and the
//! outcome of the redirect-page step.
//!
//! # Example
//!
//! ```rust
//! use gh_pdf_share::{UploadConfig, UploadProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicU32, Ordering}};
//!
//! struct ConflictCounter(AtomicU32);
//!
//! impl UploadProgressCallback for ConflictCounter {
//!     fn on_conflict(&self, attempt: u32, path: &str) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("attempt {attempt}: {path} already exists");
//!     }
//! }
//!
//! let config = UploadConfig::builder()
//!     .progress_callback(Arc::new(ConflictCounter(AtomicU32::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::RedirectError;
use crate::upload::UploadResult;
use std::sync::Arc;

/// Called by the orchestrator as an upload progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait UploadProgressCallback: Send + Sync {
    /// Called once, before the first attempt.
    fn on_upload_start(&self, file_name: &str, size_bytes: u64) {
        let _ = (file_name, size_bytes);
    }

    /// Called before each PDF write.
    ///
    /// # Arguments
    /// * `attempt`: 1-indexed attempt number
    /// * `max_attempts`: configured attempt budget
    /// * `path`: storage path generated for this attempt
    fn on_attempt(&self, attempt: u32, max_attempts: u32, path: &str) {
        let _ = (attempt, max_attempts, path);
    }

    /// Called when an attempt's path already existed (HTTP 409).
    fn on_conflict(&self, attempt: u32, path: &str) {
        let _ = (attempt, path);
    }

    /// Called once the PDF commit is confirmed.
    fn on_pdf_published(&self, pdf_url: &str) {
        let _ = pdf_url;
    }

    /// Called once the redirect page commit is confirmed.
    fn on_redirect_published(&self, html_url: &str) {
        let _ = html_url;
    }

    /// Called when the redirect page could not be written. The upload still
    /// succeeds.
    fn on_redirect_failed(&self, error: &RedirectError) {
        let _ = error;
    }

    /// Called with the final result of a successful upload.
    fn on_upload_complete(&self, result: &UploadResult) {
        let _ = result;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl UploadProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::UploadConfig`].
pub type ProgressCallback = Arc<dyn UploadProgressCallback>;
