//! Minimal client for the GitHub Contents API.
//!
//! Only one call is needed: `PUT /repos/{owner}/{repo}/contents/{path}`,
//! which creates a file with a single commit. The client does not interpret
//! status codes; the orchestrator decides what 200/201, 409 and everything
//! else mean.

use crate::config::UploadConfig;
use crate::error::ShareError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// JSON body of a create-file request.
#[derive(Debug, Serialize)]
pub struct PutFileRequest<'a> {
    pub message: &'a str,
    pub content: &'a str,
    pub branch: &'a str,
}

/// What came back from a `PUT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOutcome {
    pub status: StatusCode,
    /// The `message` field of the JSON response body, when there is one.
    pub message: Option<String>,
}

impl PutOutcome {
    /// 200 (updated) or 201 (created).
    pub fn is_created(&self) -> bool {
        self.status == StatusCode::OK || self.status == StatusCode::CREATED
    }

    /// 409: the path already exists on the branch.
    pub fn is_conflict(&self) -> bool {
        self.status == StatusCode::CONFLICT
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Contents API client bound to one credential.
#[derive(Clone)]
pub struct ContentsClient {
    http: Client,
    api_base: Url,
    token: String,
}

impl std::fmt::Debug for ContentsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentsClient")
            .field("api_base", &self.api_base.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ContentsClient {
    /// Build a client from the upload configuration.
    pub fn new(config: &UploadConfig, token: impl Into<String>) -> Result<Self, ShareError> {
        let api_base = Url::parse(&config.api_base_url).map_err(|e| {
            ShareError::InvalidConfig(format!("API base URL '{}': {e}", config.api_base_url))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept)
                .map_err(|e| ShareError::InvalidConfig(format!("Accept header: {e}")))?,
        );

        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ShareError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base,
            token: token.into(),
        })
    }

    /// `{api_base}/repos/{owner}/{repo}/contents/{path}` with every segment
    /// percent-encoded.
    pub fn endpoint(&self, owner: &str, repo: &str, path: &str) -> Result<Url, ShareError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ShareError::InvalidConfig(format!(
                    "API base URL '{}' cannot carry a path",
                    self.api_base
                ))
            })?
            .pop_if_empty()
            .extend(["repos", owner, repo, "contents"])
            .extend(path.split('/'));
        Ok(url)
    }

    /// Create `path` on `branch` with base64 `content` in one commit.
    ///
    /// Returns `Err` only when no HTTP response was received; any status,
    /// including 4xx/5xx, comes back as a [`PutOutcome`].
    pub async fn put_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        body: &PutFileRequest<'_>,
    ) -> Result<PutOutcome, ShareError> {
        let url = self.endpoint(owner, repo, path)?;
        debug!("PUT {} ({} bytes base64)", url, body.content.len());

        let response = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|source| ShareError::Transport { source })?;

        let status = response.status();
        // The body is informational only; a missing or non-JSON body must not
        // turn a 201 into a failure.
        let message = match response.text().await {
            Ok(text) => serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.message),
            Err(e) => {
                debug!("Could not read response body: {}", e);
                None
            }
        };

        debug!("PUT {} → {}", path, status);
        Ok(PutOutcome { status, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ContentsClient {
        let config = UploadConfig::builder().api_base_url(base).build().unwrap();
        ContentsClient::new(&config, "t0ken").unwrap()
    }

    #[test]
    fn endpoint_layout() {
        let c = client("https://api.github.com");
        let url = c
            .endpoint("octo", "docs", "uploads/2024/01/1-abcdefgh-a.pdf")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo/docs/contents/uploads/2024/01/1-abcdefgh-a.pdf"
        );
    }

    #[test]
    fn endpoint_keeps_enterprise_prefix() {
        let c = client("https://ghe.example.com/api/v3/");
        let url = c.endpoint("o", "r", "uploads/x.pdf").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/o/r/contents/uploads/x.pdf"
        );
    }

    #[test]
    fn endpoint_encodes_segments() {
        let c = client("https://api.github.com");
        let url = c.endpoint("o", "my repo", "uploads/x.pdf").unwrap();
        assert!(url.as_str().contains("/my%20repo/"), "got {url}");
    }

    #[test]
    fn outcome_classification() {
        let created = PutOutcome {
            status: StatusCode::CREATED,
            message: None,
        };
        let updated = PutOutcome {
            status: StatusCode::OK,
            message: None,
        };
        let conflict = PutOutcome {
            status: StatusCode::CONFLICT,
            message: None,
        };
        assert!(created.is_created() && updated.is_created());
        assert!(!conflict.is_created() && conflict.is_conflict());
    }

    #[test]
    fn debug_redacts_token() {
        let dbg = format!("{:?}", client("https://api.github.com"));
        assert!(!dbg.contains("t0ken"));
    }

    #[test]
    fn request_body_shape() {
        let body = PutFileRequest {
            message: "Upload PDF: a.pdf",
            content: "JVBERg==",
            branch: "main",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Upload PDF: a.pdf");
        assert_eq!(json["content"], "JVBERg==");
        assert_eq!(json["branch"], "main");
    }
}
