//! Extraction pipeline and record store for textvault.
//!
//! A submission (PDF bytes or a URL) flows through the [`Extractor`], the
//! resulting text is persisted by the [`Store`], and the [`Coordinator`]
//! ties the two together and hands back the new record id.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod coordinator;
pub mod extractor;
pub mod fetch;
pub mod html;
pub mod store;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use config_file::{Config, ConfigFile};
pub use coordinator::Coordinator;
pub use extractor::{Extractor, Submission};
pub use fetch::{FetchError, HttpFetcher, PageFetcher};
pub use store::Store;

/// Identifier assigned to a record by the store.
pub type RecordId = i64;

/// Which extraction path produced a record's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    Pdf,
    Url,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Pdf => "pdf",
            SourceType::Url => "url",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input kind string that is neither `pdf` nor `url`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown input kind {0:?} (expected \"pdf\" or \"url\")")]
pub struct UnknownSourceType(pub String);

impl FromStr for SourceType {
    type Err = UnknownSourceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(SourceType::Pdf),
            "url" => Ok(SourceType::Url),
            other => Err(UnknownSourceType(other.to_string())),
        }
    }
}

/// A stored unit of extracted text plus its source metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    /// Original filename or URL.
    pub source_name: String,
    pub source_type: SourceType,
    /// Full normalized text. Empty when the source had no extractable text.
    pub extracted_text: String,
    pub created_at: DateTime<Utc>,
}

/// A record without its text, as returned by listings and searches.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSummary {
    pub id: RecordId,
    pub source_name: String,
    pub source_type: SourceType,
    pub created_at: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("PDF extraction error: {0}")]
    Extraction(#[from] BackendError),
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<UnknownSourceType> for CoreError {
    fn from(e: UnknownSourceType) -> Self {
        CoreError::InvalidInput(e.to_string())
    }
}
