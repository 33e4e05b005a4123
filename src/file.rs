//! The file-input boundary: a PDF handle with a name, media type, size and a
//! way to read its bytes.
//!
//! Content is read on every upload attempt rather than once up front, so a
//! [`PdfSource::Path`] costs no memory until the orchestrator needs it.

use crate::encode;
use crate::error::ShareError;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Media type every upload must carry.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Media type assigned to content that does not start with `%PDF`.
pub const OCTET_STREAM: &str = "application/octet-stream";

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Where the bytes of a [`PdfFile`] come from.
#[derive(Clone)]
pub enum PdfSource {
    /// Content already held in memory.
    Bytes(Vec<u8>),
    /// Content read from disk on each attempt.
    Path(PathBuf),
    /// A `data:<mime>;base64,<payload>` URL, as produced by browser file readers.
    DataUrl(String),
}

impl fmt::Debug for PdfSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfSource::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            PdfSource::Path(p) => f.debug_tuple("Path").field(p).finish(),
            PdfSource::DataUrl(s) => write!(f, "DataUrl({} chars)", s.len()),
        }
    }
}

/// A file selected for upload.
#[derive(Debug, Clone)]
pub struct PdfFile {
    /// Original file name as the user picked it; only used for the storage
    /// path and commit messages.
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub source: PdfSource,
}

impl PdfFile {
    /// Wrap in-memory content, deriving the media type from its magic bytes.
    pub fn from_bytes(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: sniff_mime_type(&content).to_string(),
            size_bytes: content.len() as u64,
            source: PdfSource::Bytes(content),
        }
    }

    /// Describe a file on disk without loading it.
    ///
    /// Only the first four bytes are read here to sniff the media type; the
    /// full content is read later, once per upload attempt.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ShareError> {
        let path = path.as_ref();
        let read_err = |source| ShareError::FileRead {
            path: path.to_path_buf(),
            source,
        };

        let metadata = std::fs::metadata(path).map_err(read_err)?;
        let mut head = Vec::with_capacity(PDF_MAGIC.len());
        std::fs::File::open(path)
            .map_err(read_err)?
            .take(PDF_MAGIC.len() as u64)
            .read_to_end(&mut head)
            .map_err(read_err)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!("Resolved local file: {} ({} bytes)", path.display(), metadata.len());
        Ok(Self {
            name,
            mime_type: sniff_mime_type(&head).to_string(),
            size_bytes: metadata.len(),
            source: PdfSource::Path(path.to_path_buf()),
        })
    }

    /// Wrap a data URL whose media type and size are already known to the host.
    pub fn from_data_url(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
        data_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            source: PdfSource::DataUrl(data_url.into()),
        }
    }

    /// Read the content and return it base64-encoded, ready for the
    /// Contents API request body.
    pub async fn read_base64(&self) -> Result<String, ShareError> {
        match &self.source {
            PdfSource::Bytes(bytes) => Ok(encode::encode_content(bytes)),
            PdfSource::Path(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|source| ShareError::FileRead {
                        path: path.clone(),
                        source,
                    })?;
                Ok(encode::encode_content(&bytes))
            }
            PdfSource::DataUrl(url) => Ok(encode::strip_data_url_prefix(url).to_string()),
        }
    }
}

/// `application/pdf` when `head` starts with `%PDF`, otherwise
/// `application/octet-stream`.
pub fn sniff_mime_type(head: &[u8]) -> &'static str {
    if head.starts_with(PDF_MAGIC) {
        PDF_MIME_TYPE
    } else {
        OCTET_STREAM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use std::io::Write;

    #[test]
    fn sniff_recognises_pdf_magic() {
        assert_eq!(sniff_mime_type(b"%PDF-1.7\n"), PDF_MIME_TYPE);
        assert_eq!(sniff_mime_type(b"PK\x03\x04"), OCTET_STREAM);
        assert_eq!(sniff_mime_type(b""), OCTET_STREAM);
    }

    #[test]
    fn from_bytes_fills_metadata() {
        let file = PdfFile::from_bytes("a.pdf", b"%PDF-1.4 body".to_vec());
        assert_eq!(file.mime_type, PDF_MIME_TYPE);
        assert_eq!(file.size_bytes, 13);
        assert_eq!(file.name, "a.pdf");
    }

    #[test]
    fn from_path_reads_only_metadata() {
        let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        tmp.write_all(b"%PDF-1.5 hello").unwrap();

        let file = PdfFile::from_path(tmp.path()).unwrap();
        assert_eq!(file.mime_type, PDF_MIME_TYPE);
        assert_eq!(file.size_bytes, 14);
        assert!(file.name.ends_with(".pdf"));
        assert!(matches!(file.source, PdfSource::Path(_)));
    }

    #[test]
    fn from_path_missing_file() {
        let err = PdfFile::from_path("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, ShareError::FileRead { .. }));
    }

    #[tokio::test]
    async fn read_base64_from_each_source() {
        let content = b"%PDF-1.7 data".to_vec();
        let expected = STANDARD.encode(&content);

        let mem = PdfFile::from_bytes("m.pdf", content.clone());
        assert_eq!(mem.read_base64().await.unwrap(), expected);

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&content).unwrap();
        let disk = PdfFile::from_path(tmp.path()).unwrap();
        assert_eq!(disk.read_base64().await.unwrap(), expected);

        let url = format!("data:application/pdf;base64,{expected}");
        let data = PdfFile::from_data_url("d.pdf", PDF_MIME_TYPE, content.len() as u64, url);
        assert_eq!(data.read_base64().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn read_base64_reports_vanished_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let file = PdfFile::from_path(tmp.path()).unwrap();
        drop(tmp);
        let err = file.read_base64().await.unwrap_err();
        assert!(matches!(err, ShareError::FileRead { .. }), "got {err:?}");
    }

    #[test]
    fn debug_does_not_dump_content() {
        let file = PdfFile::from_bytes("big.pdf", vec![b'x'; 4096]);
        let dbg = format!("{file:?}");
        assert!(dbg.contains("4096 bytes"));
        assert!(!dbg.contains("xxxx"));
    }
}
