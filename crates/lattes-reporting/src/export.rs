use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::{Category, ExportError, ExportFormat, PublicationRecord};

/// Write records to `path` in the given format.
pub fn export_records(
    records: &[PublicationRecord],
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let content = render(records, format)?;
    std::fs::write(path, content).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::debug!(path = %path.display(), format = %format, records = records.len(), "exported");
    Ok(())
}

/// Render records to a string in the given format.
pub fn render(records: &[PublicationRecord], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => export_json(records),
        ExportFormat::Csv => Ok(export_csv(records)),
        ExportFormat::Markdown => Ok(export_markdown(records)),
    }
}

/// JSON array with 4-space indentation; non-ASCII text is written as-is.
pub fn export_json(records: &[PublicationRecord]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut ser)?;
    // serde_json only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn csv_escape(s: &str) -> String {
    if s.contains('"') || s.contains(',') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn export_csv(records: &[PublicationRecord]) -> String {
    let mut out = String::from("title,authors,place,year,doi,class\n");
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            csv_escape(&r.title),
            csv_escape(&r.authors),
            csv_escape(&r.place),
            csv_escape(&r.year),
            csv_escape(r.doi.as_deref().unwrap_or("")),
            csv_escape(r.category.label()),
        ));
    }
    out
}

fn md_escape(s: &str) -> String {
    s.replace('|', "\\|")
}

fn export_markdown(records: &[PublicationRecord]) -> String {
    let mut out = String::from("# Publications\n\n");

    for category in Category::ALL {
        let rows: Vec<&PublicationRecord> =
            records.iter().filter(|r| r.category == category).collect();
        out.push_str(&format!("## {} ({})\n\n", category.label(), rows.len()));
        if rows.is_empty() {
            out.push_str("_No entries._\n\n");
            continue;
        }

        out.push_str("| # | Title | Authors | Place | Year | DOI |\n");
        out.push_str("|---|-------|---------|-------|------|-----|\n");
        for (i, r) in rows.iter().enumerate() {
            let doi = match &r.doi {
                Some(d) => format!("[{}](https://doi.org/{})", md_escape(d), d),
                None => String::new(),
            };
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                i + 1,
                md_escape(&r.title),
                md_escape(&r.authors),
                md_escape(&r.place),
                r.year,
                doi,
            ));
        }
        out.push('\n');
    }
    out
}
