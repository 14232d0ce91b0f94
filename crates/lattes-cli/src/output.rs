use std::io::Write;
use std::path::Path;

use lattes_parsing::{Category, ExtractionResult, ExtractionStage};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the one-line summary after writing the output file.
pub fn print_summary(
    w: &mut dyn Write,
    count: usize,
    path: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "Wrote {} items to {}",
            count.bold(),
            path.display().bold()
        )
    } else {
        writeln!(w, "Wrote {} items to {}", count, path.display())
    }
}

fn or_none(s: &str) -> &str {
    if s.is_empty() { "(none)" } else { s }
}

/// Print every record grouped by category, without writing anything.
pub fn print_dry_run(
    w: &mut dyn Write,
    input_name: &str,
    result: &ExtractionResult,
    color: ColorMode,
) -> std::io::Result<()> {
    let stage = match result.stage {
        ExtractionStage::Structured => "structured",
        ExtractionStage::Fallback => "markup fallback",
    };
    if color.enabled() {
        writeln!(
            w,
            "{} {} ({} records, {})\n",
            "DRY RUN:".bold().cyan(),
            input_name.bold(),
            result.records.len(),
            stage
        )?;
    } else {
        writeln!(
            w,
            "DRY RUN: {} ({} records, {})\n",
            input_name,
            result.records.len(),
            stage
        )?;
    }

    for category in Category::ALL {
        let count = result.count_for(category);
        let heading = format!("{} ({})", category.label(), count);
        if color.enabled() {
            writeln!(w, "{}", heading.bold().underline())?;
        } else {
            writeln!(w, "{}", heading)?;
        }

        for (i, r) in result
            .records
            .iter()
            .filter(|r| r.category == category)
            .enumerate()
        {
            if color.enabled() {
                writeln!(w, "{}", format!("[{}]", i + 1).bold().yellow())?;
            } else {
                writeln!(w, "[{}]", i + 1)?;
            }
            writeln!(w, "  Title:   {}", or_none(&r.title))?;
            writeln!(w, "  Authors: {}", or_none(&r.authors))?;
            writeln!(w, "  Place:   {}", or_none(&r.place))?;
            writeln!(w, "  Year:    {}", or_none(&r.year))?;
            match &r.doi {
                Some(d) => writeln!(w, "  DOI:     {}", d)?,
                None if color.enabled() => writeln!(w, "  DOI:     {}", "(none)".dimmed())?,
                None => writeln!(w, "  DOI:     (none)")?,
            }
        }
        writeln!(w)?;
    }

    let s = &result.stats;
    let stats_line = format!(
        "sections found: {}, missing: {}, entries: {}, junk dropped: {}, fallback fragments: {}",
        s.sections_found, s.sections_missing, s.entries_collected, s.junk_dropped, s.fallback_fragments
    );
    if color.enabled() {
        writeln!(w, "{}", stats_line.dimmed())?;
    } else {
        writeln!(w, "{}", stats_line)?;
    }
    Ok(())
}
