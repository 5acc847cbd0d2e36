//! Multipart upload handling.

use std::io::Write;
use std::path::Path;

use axum::body::Bytes;
use axum::extract::{multipart::MultipartRejection, Multipart};
use tempfile::NamedTempFile;

use super::ApiError;
use crate::ocr::DocumentKind;

/// Name of the multipart field carrying the document.
const FILE_FIELD: &str = "file";

/// A file received in the `file` multipart field.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied filename (empty when none was given).
    pub filename: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Read the `file` field, skipping any other fields. A body that is not
    /// multipart carries no file.
    pub async fn receive(
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Option<Self>, ApiError> {
        let mut multipart = match multipart {
            Ok(multipart) => multipart,
            Err(rejection) => {
                tracing::debug!("Not a multipart upload: {}", rejection.body_text());
                return Ok(None);
            }
        };

        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            return Ok(Some(Self { filename, bytes }));
        }
        Ok(None)
    }

    /// Lowercased filename extension, if it is a plain alphanumeric token.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.len() <= 10)
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| e.to_ascii_lowercase())
    }

    pub fn is_pdf(&self) -> bool {
        self.extension().as_deref() == Some("pdf")
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::detect(&self.filename, &self.bytes)
    }

    /// Write the bytes to a uniquely named temp file, removed on drop.
    /// The client filename only contributes its extension.
    pub fn stage(&self) -> std::io::Result<NamedTempFile> {
        let suffix = self
            .extension()
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("docextract-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(&self.bytes)?;
        file.flush()?;
        Ok(file)
    }
}

/// Receive the uploaded document, rejecting a missing field or empty filename.
pub async fn receive_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Upload, ApiError> {
    let upload = Upload::receive(multipart)
        .await?
        .ok_or_else(|| ApiError::bad_request("No file provided"))?;

    if upload.filename.is_empty() {
        return Err(ApiError::bad_request("No file selected"));
    }

    Ok(upload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_sanitized() {
        assert_eq!(Upload::new("Scan.PDF", "x").extension().as_deref(), Some("pdf"));
        assert_eq!(Upload::new("photo.jpeg", "x").extension().as_deref(), Some("jpeg"));
        assert_eq!(Upload::new("noext", "x").extension(), None);
        assert_eq!(Upload::new("evil.p/../df", "x").extension(), None);
        assert_eq!(Upload::new("a.b c", "x").extension(), None);
    }

    #[test]
    fn test_is_pdf() {
        assert!(Upload::new("report.pdf", "x").is_pdf());
        assert!(Upload::new("REPORT.Pdf", "x").is_pdf());
        assert!(!Upload::new("report.pdf.png", "x").is_pdf());
        assert!(!Upload::new("", "x").is_pdf());
    }

    #[test]
    fn test_stage_writes_unique_files() {
        let upload = Upload::new("../../etc/passwd.png", "pixels");
        let a = upload.stage().unwrap();
        let b = upload.stage().unwrap();

        assert_ne!(a.path(), b.path());
        assert_eq!(std::fs::read(a.path()).unwrap(), b"pixels");
        assert!(a.path().to_string_lossy().ends_with(".png"));
        assert!(a.path().starts_with(std::env::temp_dir()));

        let path = a.path().to_path_buf();
        drop(a);
        assert!(!path.exists());
    }
}
