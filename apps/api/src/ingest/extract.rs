//! Upload text extraction: turns an uploaded file into plain text for the parser.
//!
//! `AppState` holds an `Arc<dyn TextExtractor>` so tests can swap in a canned extractor.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// An uploaded document as received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl UploadedDocument {
    /// Classifies by declared content type first, then by file extension, then by magic bytes.
    pub fn kind(&self) -> Option<DocumentKind> {
        let content_type = self
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_lowercase());
        match content_type.as_deref() {
            Some("application/pdf") => return Some(DocumentKind::Pdf),
            Some("text/plain") | Some("text/markdown") => return Some(DocumentKind::PlainText),
            _ => {}
        }

        let extension = self
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase());
        match extension.as_deref() {
            Some("pdf") => Some(DocumentKind::Pdf),
            Some("txt") | Some("md") | Some("text") => Some(DocumentKind::PlainText),
            _ if self.bytes.starts_with(b"%PDF-") => Some(DocumentKind::Pdf),
            _ => None,
        }
    }
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: UploadedDocument) -> Result<String, AppError>;
}

/// Default extractor: PDF via `pdf-extract`, text/markdown decoded as UTF-8.
pub struct DocumentTextExtractor;

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    async fn extract(&self, document: UploadedDocument) -> Result<String, AppError> {
        let kind = document.kind().ok_or_else(|| {
            AppError::UnsupportedMedia(format!(
                "Unsupported upload '{}': expected a PDF or plain-text file",
                document.file_name.as_deref().unwrap_or("file")
            ))
        })?;

        let text = match kind {
            DocumentKind::PlainText => String::from_utf8_lossy(&document.bytes).into_owned(),
            DocumentKind::Pdf => {
                let bytes = document.bytes.clone();
                // PDF decoding is CPU-bound, and pdf-extract panics on some malformed input.
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await
                    .map_err(|e| {
                        if e.is_panic() {
                            AppError::Extraction("Failed to read PDF: malformed document".to_string())
                        } else {
                            AppError::Internal(anyhow::anyhow!(
                                "spawn_blocking failed in PDF extraction: {e}"
                            ))
                        }
                    })?
                    .map_err(|e| AppError::Extraction(format!("Failed to read PDF: {e}")))?
            }
        };

        debug!(kind = ?kind, bytes = document.bytes.len(), chars = text.len(), "Extracted upload text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: Option<&str>, content_type: Option<&str>, bytes: &'static [u8]) -> UploadedDocument {
        UploadedDocument {
            file_name: name.map(String::from),
            content_type: content_type.map(String::from),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn test_kind_detection() {
        assert_eq!(
            doc(None, Some("application/pdf"), b"").kind(),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            doc(Some("cv.TXT"), Some("application/octet-stream"), b"").kind(),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(
            doc(Some("upload"), None, b"%PDF-1.7").kind(),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(doc(Some("cv.docx"), None, b"PK").kind(), None);
    }

    #[tokio::test]
    async fn test_plain_text_is_decoded() {
        let text = DocumentTextExtractor
            .extract(doc(Some("cv.md"), None, b"Jane Doe\njane@example.com"))
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe\njane@example.com");
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_rejected() {
        let err = DocumentTextExtractor
            .extract(doc(Some("cv.docx"), None, b"PK\x03\x04"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMedia(_)));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_an_extraction_error() {
        let err = DocumentTextExtractor
            .extract(doc(Some("cv.pdf"), Some("application/pdf"), b"%PDF-1.4 garbage"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
