//! Storage-path generation for uploaded PDFs.
//!
//! Every upload attempt gets a fresh path of the form
//!
//! ```text
//! uploads/<YYYY>/<MM>/<epoch-millis>-<8 base36 chars>-<sanitized name>.pdf
//! ```
//!
//! The timestamp and random suffix make two paths for the same file name
//! differ on every call, which is what gives a retry after an HTTP 409 a
//! realistic chance of succeeding.

use chrono::{DateTime, Datelike, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level directory all uploads are stored under.
pub const UPLOAD_ROOT: &str = "uploads";

/// Name used when sanitisation leaves nothing of the original file name.
pub const FALLBACK_NAME: &str = "upload";

const RANDOM_SUFFIX_LEN: usize = 8;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A repository-relative path for an uploaded PDF.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, e.g. `1717171717171-k3j9x0ab-report.pdf`.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Path of the companion redirect page: the trailing `.pdf` becomes `.html`.
    pub fn html_sibling(&self) -> String {
        match self.0.strip_suffix(".pdf") {
            Some(stem) => format!("{stem}.html"),
            None => format!("{}.html", self.0),
        }
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoragePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Source of storage paths for the upload orchestrator.
///
/// Implementations must return a different path on every call, even for the
/// same `original_name`; the orchestrator relies on that when it retries
/// after a naming conflict.
pub trait PathGenerator: Send + Sync {
    fn next_path(&self, original_name: &str) -> StoragePath;
}

/// Default generator: wall-clock time plus a thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPathGenerator;

impl PathGenerator for RandomPathGenerator {
    fn next_path(&self, original_name: &str) -> StoragePath {
        let suffix = random_suffix(&mut rand::thread_rng());
        build_path(Utc::now(), &suffix, original_name)
    }
}

/// Assemble a storage path from explicit entropy sources.
pub fn build_path(now: DateTime<Utc>, random: &str, original_name: &str) -> StoragePath {
    StoragePath(format!(
        "{UPLOAD_ROOT}/{:04}/{:02}/{}-{}-{}.pdf",
        now.year(),
        now.month(),
        now.timestamp_millis(),
        random,
        sanitize_basename(original_name)
    ))
}

/// Eight lower-case base36 characters.
pub fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..RANDOM_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

static RE_INVALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9._-]").unwrap());
static RE_DASH_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());

/// Reduce a user-supplied file name to `[a-z0-9._-]+` without a `.pdf` suffix.
///
/// Steps, in order:
/// 1. every character outside `[a-zA-Z0-9._-]` becomes `-`
/// 2. runs of `-` collapse to one
/// 3. ASCII lower-casing
/// 4. leading/trailing `-` and trailing `.pdf` are stripped until neither
///    remains, so `report.PDF.pdf` and `a-.pdf` both come out clean
/// 5. an empty result becomes [`FALLBACK_NAME`]
///
/// The function is idempotent: `sanitize_basename(&sanitize_basename(x)) ==
/// sanitize_basename(x)`.
pub fn sanitize_basename(original_name: &str) -> String {
    let replaced = RE_INVALID_CHARS.replace_all(original_name, "-");
    let collapsed = RE_DASH_RUNS.replace_all(&replaced, "-");
    let lowered = collapsed.to_ascii_lowercase();

    let mut name = lowered.as_str();
    loop {
        name = name.trim_matches('-');
        match name.strip_suffix(".pdf") {
            Some(stem) => name = stem,
            None => break,
        }
    }

    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name.to_string()
    }
}
