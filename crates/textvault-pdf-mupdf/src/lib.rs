use mupdf::{Document, TextPageFlags};

use textvault_core::{BackendError, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the rest of the workspace does not
/// transitively depend on it.
///
/// Each page's text lines are joined with `\n` and pages are joined with
/// `\n`. Pages without a text layer (scanned images) yield an empty segment.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

const PDF_MIME: &str = "application/pdf";

impl PdfBackend for MupdfBackend {
    fn extract_text(&self, data: &[u8]) -> Result<String, BackendError> {
        if data.is_empty() {
            return Err(BackendError::OpenError("empty document".into()));
        }

        let document = Document::from_bytes(data, PDF_MIME)
            .map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            let mut lines = Vec::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    lines.push(line_text);
                }
            }
            pages_text.push(lines.join("\n"));
        }

        Ok(pages_text.join("\n"))
    }
}
