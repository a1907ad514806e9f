//! Receive → extract → persist, one submission at a time.

use std::sync::Arc;

use crate::extractor::{Extractor, Submission};
use crate::store::Store;
use crate::{CoreError, Record, RecordId, RecordSummary};

/// Orchestrates extraction and persistence for each submission.
///
/// Extraction strictly precedes the insert, so a failed extraction never
/// leaves a partial record behind. Store access runs on the blocking pool.
#[derive(Clone)]
pub struct Coordinator {
    extractor: Extractor,
    store: Arc<Store>,
}

impl Coordinator {
    pub fn new(extractor: Extractor, store: Arc<Store>) -> Self {
        Self { extractor, store }
    }

    /// Untyped entry point: `input_kind` must be `"pdf"` or `"url"`.
    pub async fn process(
        &self,
        input_kind: &str,
        payload: Vec<u8>,
        source_name: &str,
    ) -> Result<RecordId, CoreError> {
        let submission = Submission::parse(input_kind, payload, source_name)?;
        self.submit(submission).await
    }

    /// Extract `submission` and store the result, returning the new id.
    pub async fn submit(&self, submission: Submission) -> Result<RecordId, CoreError> {
        let text = self.extractor.extract(&submission).await?;
        let source_type = submission.source_type();
        let source_name = match submission {
            Submission::Pdf { name, .. } => name,
            Submission::Url(url) => url,
        };

        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.create(&source_name, source_type, &text))
            .await?
    }

    pub async fn list_all(&self) -> Result<Vec<RecordSummary>, CoreError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.list_all()).await?
    }

    pub async fn search(&self, keyword: &str) -> Result<Vec<RecordSummary>, CoreError> {
        let store = Arc::clone(&self.store);
        let keyword = keyword.to_string();
        tokio::task::spawn_blocking(move || store.search(&keyword)).await?
    }

    pub async fn get(&self, id: RecordId) -> Result<Record, CoreError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.get(id)).await?
    }
}
