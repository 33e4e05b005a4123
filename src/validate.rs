//! Precondition checks run before any remote call.
//!
//! The checks mirror what the upload form enforces: every field filled in,
//! a PDF media type, and a size within the configured limit.

use crate::config::UploadConfig;
use crate::error::ShareError;
use crate::file::PDF_MIME_TYPE;
use crate::upload::UploadRequest;

/// Validate `request` against `config`.
///
/// Text fields are checked after trimming; an empty branch is not an error
/// because [`UploadRequest::effective_branch`] falls back to `main`.
pub fn validate_request(request: &UploadRequest, config: &UploadConfig) -> Result<(), ShareError> {
    let required = [
        ("owner", request.owner.as_str()),
        ("repo", request.repo.as_str()),
        ("token", request.credential.as_str()),
        ("file", request.file.name.as_str()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(ShareError::MissingField { field: *field });
    }

    if request.file.mime_type != PDF_MIME_TYPE {
        return Err(ShareError::NotAPdf {
            mime_type: request.file.mime_type.clone(),
        });
    }

    if request.file.size_bytes > config.max_file_size {
        return Err(ShareError::FileTooLarge {
            size: request.file.size_bytes,
            limit: config.max_file_size,
        });
    }

    Ok(())
}
