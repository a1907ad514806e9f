use axum::extract::Multipart;
use textvault_core::{CoreError, Submission};

use crate::error::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// An uploaded file with its data and metadata.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed form fields from the submission form.
#[derive(Debug, Default)]
pub struct FormFields {
    pub file: Option<UploadedFile>,
    pub url: String,
}

/// Parse the multipart submission form.
///
/// A file input left empty arrives as a part with no filename and no bytes;
/// it is treated as absent.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<FormFields, AppError> {
    let mut fields = FormFields::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?.to_vec();
                if filename.is_empty() && data.is_empty() {
                    continue;
                }
                fields.file = Some(UploadedFile { filename, data });
            }
            "url" => {
                fields.url = field.text().await?.trim().to_string();
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    Ok(fields)
}

impl FormFields {
    /// Pick the submission: a non-empty file wins over the URL field.
    pub fn into_submission(self) -> Result<Submission, CoreError> {
        if let Some(file) = self.file {
            let name = sanitize_filename(&file.filename)?;
            check_pdf(&name, &file.data)?;
            return Ok(Submission::Pdf {
                name,
                data: file.data,
            });
        }
        if self.url.is_empty() {
            return Err(CoreError::InvalidInput(
                "choose a PDF file or enter a URL".into(),
            ));
        }
        Ok(Submission::Url(self.url))
    }
}

/// Reduce a client-supplied filename to its last path component.
///
/// Both separators are honoured since browsers on Windows may send full
/// paths.
pub fn sanitize_filename(raw: &str) -> Result<String, CoreError> {
    let base = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        return Err(CoreError::InvalidInput("uploaded file has no name".into()));
    }
    Ok(base.to_string())
}

/// Require a `.pdf` extension and the PDF magic bytes.
fn check_pdf(filename: &str, data: &[u8]) -> Result<(), CoreError> {
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(CoreError::InvalidInput(format!(
            "{filename}: only .pdf files can be uploaded"
        )));
    }
    if !data.starts_with(PDF_MAGIC) {
        return Err(CoreError::InvalidInput(format!(
            "{filename}: file has .pdf extension but doesn't appear to be a valid PDF"
        )));
    }
    Ok(())
}
