use std::io::Write;

use owo_colors::OwoColorize;
use textvault_core::{Record, RecordId, RecordSummary, SourceType};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the confirmation after a successful `add`.
pub fn print_created(
    w: &mut dyn Write,
    id: RecordId,
    source_name: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} record #{} from {}", "Stored".green().bold(), id, source_name)?;
    } else {
        writeln!(w, "Stored record #{} from {}", id, source_name)?;
    }
    Ok(())
}

/// Print a listing, one record per line, followed by a count.
pub fn print_summaries(
    w: &mut dyn Write,
    records: &[RecordSummary],
    color: ColorMode,
) -> std::io::Result<()> {
    if records.is_empty() {
        if color.enabled() {
            writeln!(w, "{}", "No records.".dimmed())?;
        } else {
            writeln!(w, "No records.")?;
        }
        return Ok(());
    }

    for r in records {
        let when = r.created_at.format("%Y-%m-%d %H:%M");
        let kind = type_label(r.source_type);
        if color.enabled() {
            let kind = match r.source_type {
                SourceType::Pdf => kind.cyan().to_string(),
                SourceType::Url => kind.magenta().to_string(),
            };
            writeln!(
                w,
                "{:>5}  {}  {}  {}",
                r.id.bold(),
                kind,
                when.dimmed(),
                truncate(&r.source_name, 80)
            )?;
        } else {
            writeln!(
                w,
                "{:>5}  {}  {}  {}",
                r.id,
                kind,
                when,
                truncate(&r.source_name, 80)
            )?;
        }
    }

    let msg = match records.len() {
        1 => "1 record".to_string(),
        n => format!("{n} records"),
    };
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", msg.dimmed())?;
    } else {
        writeln!(w, "{}", msg)?;
    }
    Ok(())
}

/// Print a single record with its full text.
pub fn print_record(w: &mut dyn Write, record: &Record, color: ColorMode) -> std::io::Result<()> {
    let sep = "=".repeat(60);
    let when = record.created_at.format("%Y-%m-%d %H:%M:%S UTC");
    if color.enabled() {
        writeln!(w, "{} #{}", "Record".bold(), record.id)?;
        writeln!(w, "{} {}", "Source:".bold(), record.source_name)?;
        writeln!(w, "{} {}", "Type:".bold(), record.source_type)?;
        writeln!(w, "{} {}", "Added:".bold(), when)?;
        writeln!(w, "{}", sep.dimmed())?;
    } else {
        writeln!(w, "Record #{}", record.id)?;
        writeln!(w, "Source: {}", record.source_name)?;
        writeln!(w, "Type: {}", record.source_type)?;
        writeln!(w, "Added: {}", when)?;
        writeln!(w, "{}", sep)?;
    }

    if record.extracted_text.is_empty() {
        let msg = "(no extractable text)";
        if color.enabled() {
            writeln!(w, "{}", msg.dimmed())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    } else {
        writeln!(w, "{}", record.extracted_text)?;
    }
    Ok(())
}

fn type_label(ty: SourceType) -> &'static str {
    match ty {
        SourceType::Pdf => "PDF",
        SourceType::Url => "URL",
    }
}

/// Shorten to at most `max` characters, appending `...` when cut.
fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
