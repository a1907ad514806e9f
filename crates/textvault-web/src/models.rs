use serde::{Deserialize, Serialize};
use textvault_core::{Record, RecordId, RecordSummary};

// ── Request shapes ──────────────────────────────────────────────────────

/// `?q=` on the listing routes.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

impl SearchParams {
    pub fn keyword(&self) -> &str {
        self.q.as_deref().unwrap_or("").trim()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub url: String,
}

// ── Response shapes ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RecordSummaryJson {
    pub id: RecordId,
    pub source_name: String,
    pub source_type: &'static str,
    pub created_at: String,
}

impl From<&RecordSummary> for RecordSummaryJson {
    fn from(r: &RecordSummary) -> Self {
        Self {
            id: r.id,
            source_name: r.source_name.clone(),
            source_type: r.source_type.as_str(),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordJson {
    pub id: RecordId,
    pub source_name: String,
    pub source_type: &'static str,
    pub extracted_text: String,
    pub created_at: String,
}

impl From<Record> for RecordJson {
    fn from(r: Record) -> Self {
        Self {
            id: r.id,
            source_name: r.source_name,
            source_type: r.source_type.as_str(),
            extracted_text: r.extracted_text,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedJson {
    pub id: RecordId,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorJson {
    pub error: String,
}
