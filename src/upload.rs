//! The upload orchestrator.
//!
//! ## Attempt loop
//!
//! ```text
//! attempt < max_attempts ──▶ new path ──▶ read + base64 ──▶ PUT
//!        ▲                                                   │
//!        └──────────────── 409 (path exists) ◀───────────────┤
//!                                                            ├─ 200/201 ──▶ redirect page (best effort) ──▶ Ok
//!                                                            ├─ other   ──▶ Err(RemoteRejected)
//!                                                            └─ no resp ──▶ Err(Transport)
//! ```
//!
//! Only a naming conflict is retried, and every retry draws a fresh path.
//! The redirect page is written strictly after the PDF commit is confirmed,
//! and its failure never fails the upload.

use crate::config::{RedirectPage, UploadConfig, DEFAULT_BRANCH};
use crate::contents::{ContentsClient, PutFileRequest};
use crate::error::{status_fallback, RedirectError, ShareError};
use crate::file::PdfFile;
use crate::path::StoragePath;
use crate::validate::validate_request;
use crate::{encode, redirect};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Everything needed for one upload.
#[derive(Clone)]
pub struct UploadRequest {
    pub owner: String,
    pub repo: String,
    /// Target branch; empty means [`DEFAULT_BRANCH`].
    pub branch: String,
    /// Personal access token with `contents: write` on the repository.
    pub credential: String,
    pub file: PdfFile,
}

impl UploadRequest {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        credential: impl Into<String>,
        file: PdfFile,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            credential: credential.into(),
            file,
        }
    }

    /// The trimmed branch, or `main` when none was given.
    pub fn effective_branch(&self) -> &str {
        match self.branch.trim() {
            "" => DEFAULT_BRANCH,
            b => b,
        }
    }
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("credential", &"<redacted>")
            .field("file", &self.file)
            .finish()
    }
}

/// Public URLs of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Direct URL of the PDF on the Pages site.
    pub pdf_url: String,
    /// URL to share: the redirect page, or `pdf_url` when none was published.
    pub html_url: String,
    /// Repository-relative path of the PDF.
    pub path: String,
    /// PDF writes it took, including the successful one.
    pub attempts: u32,
}

impl UploadResult {
    pub fn has_redirect_page(&self) -> bool {
        self.html_url != self.pdf_url
    }
}

/// Validate `request` and upload it.
///
/// This is the entry point a front end should call: validation errors come
/// back before any network traffic, everything else is [`upload`].
pub async fn submit(
    request: &UploadRequest,
    config: &UploadConfig,
) -> Result<UploadResult, ShareError> {
    validate_request(request, config)?;
    upload(request, config).await
}

/// Blocking wrapper around [`submit`].
///
/// Creates a temporary tokio runtime internally.
pub fn submit_sync(
    request: &UploadRequest,
    config: &UploadConfig,
) -> Result<UploadResult, ShareError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ShareError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(submit(request, config))
}

/// Upload the PDF under a fresh unique path and publish its redirect page.
///
/// Does not validate the request; see [`submit`].
///
/// # Errors
/// - [`ShareError::NamingConflictExhausted`] after `max_attempts` HTTP 409s
/// - [`ShareError::RemoteRejected`] on the first other non-success status
/// - [`ShareError::Transport`] / [`ShareError::FileRead`] when no response
///   could be obtained or the file could not be read
pub async fn upload(
    request: &UploadRequest,
    config: &UploadConfig,
) -> Result<UploadResult, ShareError> {
    let owner = request.owner.trim();
    let repo = request.repo.trim();
    let branch = request.effective_branch();
    let file = &request.file;
    let client = ContentsClient::new(config, request.credential.trim())?;

    info!(
        "Uploading '{}' ({} bytes) to {}/{}@{}",
        file.name, file.size_bytes, owner, repo, branch
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_upload_start(&file.name, file.size_bytes);
    }

    let commit_message = format!("Upload PDF: {}", file.name);
    let max_attempts = config.max_attempts.max(1);
    let mut attempt: u32 = 0;

    while attempt < max_attempts {
        let number = attempt + 1;
        let path = config.path_generator.next_path(&file.name);
        debug!("Attempt {}/{}: {}", number, max_attempts, path);
        if let Some(ref cb) = config.progress_callback {
            cb.on_attempt(number, max_attempts, path.as_str());
        }

        let content = file.read_base64().await?;
        let body = PutFileRequest {
            message: &commit_message,
            content: &content,
            branch,
        };
        let outcome = client.put_file(owner, repo, path.as_str(), &body).await?;

        if outcome.is_created() {
            let pdf_url = config.public_url(owner, repo, path.as_str());
            info!("Published {}", pdf_url);
            if let Some(ref cb) = config.progress_callback {
                cb.on_pdf_published(&pdf_url);
            }

            let html_url = match config.redirect_page {
                RedirectPage::Skip => pdf_url.clone(),
                RedirectPage::Publish => {
                    match publish_redirect(&client, config, owner, repo, branch, &path, &file.name)
                        .await
                    {
                        Ok(url) => {
                            if let Some(ref cb) = config.progress_callback {
                                cb.on_redirect_published(&url);
                            }
                            url
                        }
                        Err(e) => {
                            warn!("Redirect page not published, sharing the PDF URL: {}", e);
                            if let Some(ref cb) = config.progress_callback {
                                cb.on_redirect_failed(&e);
                            }
                            pdf_url.clone()
                        }
                    }
                }
            };

            let result = UploadResult {
                pdf_url,
                html_url,
                path: path.as_str().to_string(),
                attempts: number,
            };
            if let Some(ref cb) = config.progress_callback {
                cb.on_upload_complete(&result);
            }
            return Ok(result);
        }

        if outcome.is_conflict() {
            attempt += 1;
            warn!(
                "Attempt {}/{}: '{}' already exists, retrying with a new name",
                number, max_attempts, path
            );
            if let Some(ref cb) = config.progress_callback {
                cb.on_conflict(number, path.as_str());
            }
            continue;
        }

        return Err(ShareError::rejected(outcome.status, outcome.message));
    }

    Err(ShareError::NamingConflictExhausted {
        attempts: max_attempts,
    })
}

/// Write the `.html` sibling of `pdf_path` and return its public URL.
async fn publish_redirect(
    client: &ContentsClient,
    config: &UploadConfig,
    owner: &str,
    repo: &str,
    branch: &str,
    pdf_path: &StoragePath,
    original_name: &str,
) -> Result<String, RedirectError> {
    let html_path = pdf_path.html_sibling();
    let page = redirect::render_redirect_page(pdf_path.file_name());
    let content = encode::encode_text(&page);
    let message = format!("Add redirect page for {original_name}");
    let body = PutFileRequest {
        message: &message,
        content: &content,
        branch,
    };

    let outcome = client
        .put_file(owner, repo, &html_path, &body)
        .await
        .map_err(|e| RedirectError::Transport {
            detail: e.to_string(),
        })?;

    if outcome.is_created() {
        Ok(config.public_url(owner, repo, &html_path))
    } else {
        Err(RedirectError::Rejected {
            status: outcome.status.as_u16(),
            message: outcome
                .message
                .unwrap_or_else(|| status_fallback(outcome.status)),
        })
    }
}
