use std::sync::Arc;

use crate::backend::PdfBackend;
use crate::fetch::PageFetcher;
use crate::{CoreError, SourceType, html};

/// One submission to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// An uploaded PDF and its original filename.
    Pdf { name: String, data: Vec<u8> },
    /// A web page address.
    Url(String),
}

impl Submission {
    /// Build a submission from an untyped `(kind, payload, name)` triple.
    ///
    /// For URLs the payload must be UTF-8 and becomes the source name;
    /// `source_name` is only used for PDFs.
    pub fn parse(input_kind: &str, payload: Vec<u8>, source_name: &str) -> Result<Self, CoreError> {
        match input_kind.parse::<SourceType>()? {
            SourceType::Pdf => Ok(Submission::Pdf {
                name: source_name.to_string(),
                data: payload,
            }),
            SourceType::Url => {
                let url = String::from_utf8(payload)
                    .map_err(|_| CoreError::InvalidInput("URL is not valid UTF-8".into()))?;
                Ok(Submission::Url(url))
            }
        }
    }

    pub fn source_type(&self) -> SourceType {
        match self {
            Submission::Pdf { .. } => SourceType::Pdf,
            Submission::Url(_) => SourceType::Url,
        }
    }

    /// The label stored alongside the extracted text.
    pub fn source_name(&self) -> &str {
        match self {
            Submission::Pdf { name, .. } => name,
            Submission::Url(url) => url,
        }
    }
}

/// Turns submissions into plain text.
///
/// Has no access to the store; the only side effect is the outbound request
/// made for URL submissions.
#[derive(Clone)]
pub struct Extractor {
    pdf: Arc<dyn PdfBackend>,
    fetcher: Arc<dyn PageFetcher>,
}

impl Extractor {
    pub fn new(pdf: Arc<dyn PdfBackend>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { pdf, fetcher }
    }

    /// Dispatch on the submission kind.
    pub async fn extract(&self, input: &Submission) -> Result<String, CoreError> {
        match input {
            Submission::Pdf { data, .. } => self.extract_pdf(data.clone()).await,
            Submission::Url(url) => self.extract_url(url).await,
        }
    }

    /// Page texts in document order, joined with `\n`.
    ///
    /// Parsing runs on the blocking pool.
    pub async fn extract_pdf(&self, data: Vec<u8>) -> Result<String, CoreError> {
        let backend = Arc::clone(&self.pdf);
        let len = data.len();
        let text = tokio::task::spawn_blocking(move || backend.extract_text(&data)).await??;
        tracing::debug!(bytes = len, chars = text.len(), "extracted PDF text");
        Ok(text)
    }

    /// Visible text of the page at `url`, whitespace-normalized.
    pub async fn extract_url(&self, url: &str) -> Result<String, CoreError> {
        let body = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(source) => {
                tracing::warn!(url, error = %source, "fetch failed");
                return Err(CoreError::Fetch {
                    url: url.to_string(),
                    source,
                });
            }
        };

        // scraper's DOM is !Send, so parse off the async executor.
        let text = tokio::task::spawn_blocking(move || html::visible_text(&body)).await?;
        tracing::debug!(url, chars = text.len(), "extracted page text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::mock::{MockFetcher, MockPdfBackend};

    fn extractor(fetcher: MockFetcher) -> Extractor {
        Extractor::new(Arc::new(MockPdfBackend::new()), Arc::new(fetcher))
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        let err = Submission::parse("docx", b"data".to_vec(), "a.docx").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn parse_url_uses_url_as_source_name() {
        let sub = Submission::parse("url", b"https://example.com".to_vec(), "ignored").unwrap();
        assert_eq!(sub, Submission::Url("https://example.com".into()));
        assert_eq!(sub.source_name(), "https://example.com");
        assert_eq!(sub.source_type(), SourceType::Url);
    }

    #[test]
    fn parse_url_rejects_invalid_utf8() {
        let err = Submission::parse("url", vec![0xff, 0xfe], "x").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn parse_pdf_keeps_filename() {
        let sub = Submission::parse("pdf", b"%PDF-".to_vec(), "report.pdf").unwrap();
        assert_eq!(sub.source_name(), "report.pdf");
        assert_eq!(sub.source_type(), SourceType::Pdf);
    }

    #[tokio::test]
    async fn pdf_pages_joined_with_newline() {
        let ex = extractor(MockFetcher::new());
        let text = ex
            .extract_pdf(MockPdfBackend::document(&["Hello", "World"]))
            .await
            .unwrap();
        assert_eq!(text, "Hello\nWorld");
    }

    #[tokio::test]
    async fn pdf_without_pages_is_empty() {
        let ex = extractor(MockFetcher::new());
        assert_eq!(ex.extract_pdf(MockPdfBackend::document(&[])).await.unwrap(), "");
    }

    #[tokio::test]
    async fn unparseable_pdf_is_extraction_error() {
        let ex = extractor(MockFetcher::new());
        let err = ex.extract_pdf(b"GIF89a".to_vec()).await.unwrap_err();
        assert!(matches!(err, CoreError::Extraction(_)));
    }

    #[tokio::test]
    async fn url_text_is_normalized() {
        let ex = extractor(MockFetcher::new().with_page(
            "https://acme.test/",
            "<html><script>x()</script><body>  Acme \n Corp  </body></html>",
        ));
        assert_eq!(ex.extract_url("https://acme.test/").await.unwrap(), "Acme Corp");
    }

    #[tokio::test]
    async fn fetch_failure_keeps_url_and_cause() {
        let ex = extractor(
            MockFetcher::new().with_error("https://down.test/", FetchError::Status(503)),
        );
        match ex.extract_url("https://down.test/").await.unwrap_err() {
            CoreError::Fetch { url, source } => {
                assert_eq!(url, "https://down.test/");
                assert_eq!(source, FetchError::Status(503));
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn extract_dispatches_on_variant() {
        let ex = extractor(MockFetcher::new().with_page("https://a.test/", "<p>page</p>"));
        let pdf = Submission::Pdf {
            name: "a.pdf".into(),
            data: MockPdfBackend::document(&["doc"]),
        };
        assert_eq!(ex.extract(&pdf).await.unwrap(), "doc");
        let url = Submission::Url("https://a.test/".into());
        assert_eq!(ex.extract(&url).await.unwrap(), "page");
    }
}
