//! Scripted [`PageFetcher`] and [`PdfBackend`] doubles for tests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{BackendError, PdfBackend};
use crate::fetch::{FetchError, PageFetcher};

/// A configurable mock response for [`MockFetcher`].
#[derive(Clone, Debug)]
pub enum MockPage {
    /// Serve this HTML body.
    Html(String),
    /// Fail the fetch.
    Error(FetchError),
}

/// A hand-rolled mock implementing [`PageFetcher`].
///
/// Pages are registered per URL; any other URL fails with a transport error,
/// as an unreachable host would. Every requested URL is recorded.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, MockPage>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages
            .insert(url.to_string(), MockPage::Html(html.to_string()));
        self
    }

    /// Fail requests for `url` with `error`.
    pub fn with_error(mut self, url: &str, error: FetchError) -> Self {
        self.pages.insert(url.to_string(), MockPage::Error(error));
        self
    }

    /// URLs requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

impl PageFetcher for MockFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(url.to_string());
        let page = self.pages.get(url).cloned();

        Box::pin(async move {
            match page {
                Some(MockPage::Html(body)) => Ok(body),
                Some(MockPage::Error(e)) => Err(e),
                None => Err(FetchError::Transport(format!("no route to {url}"))),
            }
        })
    }
}

/// A [`PdfBackend`] over a toy document format.
///
/// A "document" is `%PDF-` followed by UTF-8 page texts separated by form
/// feeds (`\x0c`); `%PDF-` alone has zero pages. Anything else is rejected
/// as unparseable. Use [`MockPdfBackend::document`] to build one.
#[derive(Default)]
pub struct MockPdfBackend {
    call_count: AtomicUsize,
}

impl MockPdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `pages` in the toy format.
    pub fn document(pages: &[&str]) -> Vec<u8> {
        let mut out = b"%PDF-".to_vec();
        out.extend_from_slice(pages.join("\x0c").as_bytes());
        out
    }

    /// How many times `extract_text()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MockPdfBackend {
    fn extract_text(&self, data: &[u8]) -> Result<String, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let body = data
            .strip_prefix(b"%PDF-")
            .ok_or_else(|| BackendError::OpenError("missing %PDF- header".into()))?;
        let body = std::str::from_utf8(body)
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

        if body.is_empty() {
            return Ok(String::new());
        }
        Ok(body.split('\x0c').collect::<Vec<_>>().join("\n"))
    }
}
