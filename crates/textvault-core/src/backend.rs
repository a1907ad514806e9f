use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
}

/// Trait for PDF text extraction backends.
///
/// Implementors turn an in-memory PDF into plain text: the text of each page
/// in document order, pages joined with a single `\n`. A document with no
/// pages yields an empty string, and a page without a text layer contributes
/// an empty segment rather than an error.
pub trait PdfBackend: Send + Sync {
    /// Extract the full text content of a PDF held in memory.
    fn extract_text(&self, data: &[u8]) -> Result<String, BackendError>;
}
