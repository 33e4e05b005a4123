//! Error types for the gh-pdf-share library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ShareError`]: **Fatal**: the upload cannot succeed (invalid form
//!   input, remote rejection, network failure, naming conflicts on every
//!   attempt). Returned as `Err(ShareError)` from [`crate::upload::upload`]
//!   and [`crate::upload::submit`].
//!
//! * [`RedirectError`]: **Non-fatal**: the PDF is already published but the
//!   companion HTML redirect page could not be written. The orchestrator logs
//!   it, reports it through the progress callback and degrades
//!   `html_url` to `pdf_url`.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the gh-pdf-share library.
#[derive(Debug, Error)]
pub enum ShareError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// A required form field (owner, repo, branch, token, file) is empty.
    #[error("Please fill in all required fields. Missing: {field}")]
    MissingField { field: &'static str },

    /// The file's media type is not `application/pdf`.
    #[error("Only PDF files are allowed (got '{mime_type}').")]
    NotAPdf { mime_type: String },

    /// The file is larger than the configured upload limit.
    #[error("File size exceeds {}MB limit ({size} bytes).", .limit / (1024 * 1024))]
    FileTooLarge { size: u64, limit: u64 },

    // ── Remote errors ─────────────────────────────────────────────────────
    /// Every attempt hit an existing path (HTTP 409).
    #[error("Failed to generate unique filename after {attempts} attempts. Please try again.")]
    NamingConflictExhausted { attempts: u32 },

    /// The API answered with a status other than 200/201/409.
    ///
    /// Displays only the message: either the `message` field of the JSON
    /// response body or an `HTTP <code>: <reason>` fallback.
    #[error("{message}")]
    RemoteRejected { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("Upload failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// The PDF content could not be read from disk.
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The local credential cache could not be read or written.
    #[error("Credential cache error at '{path}': {detail}")]
    CredentialStore { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShareError {
    /// Build a [`ShareError::RemoteRejected`] from a status and an optional
    /// remote-supplied message.
    pub fn rejected(status: StatusCode, message: Option<String>) -> Self {
        ShareError::RemoteRejected {
            status: status.as_u16(),
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| status_fallback(status)),
        }
    }

    /// `true` for errors detected before any remote call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ShareError::MissingField { .. }
                | ShareError::NotAPdf { .. }
                | ShareError::FileTooLarge { .. }
        )
    }
}

/// `HTTP 500: Internal Server Error` style message for bodies without a
/// `message` field.
pub fn status_fallback(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}

/// A non-fatal failure of the redirect-page publishing step.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum RedirectError {
    /// The API answered the redirect-page write with a non-success status.
    #[error("redirect page rejected with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The redirect-page write failed before a response arrived.
    #[error("redirect page request failed: {detail}")]
    Transport { detail: String },
}
