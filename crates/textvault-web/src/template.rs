use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};

use textvault_core::{Record, RecordSummary};

const INDEX_HTML: &str = include_str!("../templates/index.html");
const LIST_HTML: &str = include_str!("../templates/list.html");
const DETAIL_HTML: &str = include_str!("../templates/detail.html");
const ERROR_HTML: &str = include_str!("../templates/error.html");
const STYLE_CSS: &str = include_str!("../static/style.css");

/// Substitute `{{ key }}` placeholders in a single pass.
///
/// Values are inserted verbatim, so callers escape them first. Substituted
/// text is never rescanned, and unknown keys are left in place.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = after[..end].trim();
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

pub fn format_time(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// The upload form, optionally with an error message and the URL that was
/// submitted.
pub fn render_index(message: Option<&str>, url: &str) -> Html<String> {
    let message = message
        .map(|m| format!(r#"<p class="error">{}</p>"#, encode_text(m)))
        .unwrap_or_default();
    Html(fill(
        INDEX_HTML,
        &[
            ("message", &message),
            ("url", &encode_double_quoted_attribute(url)),
        ],
    ))
}

pub fn render_list(records: &[RecordSummary], query: &str) -> Html<String> {
    let rows: String = records
        .iter()
        .map(|r| {
            format!(
                "    <tr><td>{id}</td><td><a href=\"/records/{id}\">{name}</a></td><td>{ty}</td><td>{at}</td></tr>\n",
                id = r.id,
                name = encode_text(&r.source_name),
                ty = r.source_type,
                at = format_time(&r.created_at),
            )
        })
        .collect();

    let count = match (records.len(), query.is_empty()) {
        (0, true) => "No records yet.".to_string(),
        (0, false) => format!("No records match \u{201c}{}\u{201d}.", encode_text(query)),
        (1, _) => "1 record".to_string(),
        (n, _) => format!("{n} records"),
    };

    Html(fill(
        LIST_HTML,
        &[
            ("query", &encode_double_quoted_attribute(query)),
            ("count", &count),
            ("rows", rows.trim_end()),
        ],
    ))
}

pub fn render_detail(record: &Record) -> Html<String> {
    Html(fill(
        DETAIL_HTML,
        &[
            ("source_name", &encode_text(&record.source_name)),
            ("id", &record.id.to_string()),
            ("source_type", record.source_type.as_str()),
            ("created_at", &format_time(&record.created_at)),
            ("text", &encode_text(&record.extracted_text)),
        ],
    ))
}

pub fn render_error(status: StatusCode, message: &str) -> Html<String> {
    Html(fill(
        ERROR_HTML,
        &[
            ("status", &status.to_string()),
            ("message", &encode_text(message)),
        ],
    ))
}

pub async fn serve_style() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}
