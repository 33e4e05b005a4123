//! # gh-pdf-share
//!
//! Upload a PDF to a GitHub repository through the Contents API and get back
//! the GitHub Pages URL to share it with.
//!
//! ## Flow
//!
//! ```text
//! PdfFile
//!  │
//!  ├─ 1. Validate  required fields, application/pdf, ≤ 25 MiB
//!  ├─ 2. Path      uploads/YYYY/MM/<millis>-<base36>-<name>.pdf
//!  ├─ 3. Encode    bytes → base64
//!  ├─ 4. PUT       /repos/{owner}/{repo}/contents/{path}   (409 → back to 2)
//!  ├─ 5. Redirect  optional .html sibling for webmail clients (best effort)
//!  └─ 6. Result    pdf_url + html_url on https://{owner}.github.io/{repo}/
//! ```
//!
//! The public URLs are derived, not returned by the API: they resolve only
//! once GitHub Pages is enabled for the target branch and the site has been
//! rebuilt (usually a minute or two after the commit).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gh_pdf_share::{submit, PdfFile, UploadConfig, UploadRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let file = PdfFile::from_path("report.pdf")?;
//!     let request = UploadRequest::new("octocat", "docs", "main", "ghp_…", file);
//!     let result = submit(&request, &UploadConfig::default()).await?;
//!     println!("share: {}", result.html_url);
//!     println!("pdf:   {}", result.pdf_url);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `gh-pdf-share` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod contents;
pub mod credentials;
pub mod encode;
pub mod error;
pub mod file;
pub mod path;
pub mod progress;
pub mod redirect;
pub mod upload;
pub mod validate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RedirectPage, UploadConfig, UploadConfigBuilder};
pub use credentials::{CredentialStore, FileCredentialStore};
pub use error::{RedirectError, ShareError};
pub use file::{PdfFile, PdfSource};
pub use path::{sanitize_basename, PathGenerator, RandomPathGenerator, StoragePath};
pub use progress::{NoopProgressCallback, ProgressCallback, UploadProgressCallback};
pub use upload::{submit, submit_sync, upload, UploadRequest, UploadResult};
pub use validate::validate_request;
