use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;
use crate::identifiers::{find_doi, last_year_with_config};
use crate::text_processing::clean_whitespace;
use crate::{Category, PublicationRecord};

/// Lattes prints the author list, then a space-dot-space, then the title.
static AUTHORS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*?)\s\.\s").unwrap());

const PLACE_TRIM: &[char] = &[' ', ',', '.', ';'];

/// Parse one citation's text into a [`PublicationRecord`].
///
/// Expected layout: `AUTHORS . TITLE . PLACE, ... YEAR. DOI`. Anything that
/// deviates degrades to empty fields rather than failing.
pub fn parse_entry_text(text: &str, category: Category) -> PublicationRecord {
    parse_entry_text_with_config(text, category, &ParsingConfig::default())
}

/// Config-aware version of [`parse_entry_text`].
pub(crate) fn parse_entry_text_with_config(
    text: &str,
    category: Category,
    config: &ParsingConfig,
) -> PublicationRecord {
    let mut working = clean_whitespace(text);

    let doi = find_doi(&working, config).map(|m| m.as_str().to_string());
    if let Some(ref d) = doi {
        working = working.replace(d.as_str(), " ");
    }

    let (authors, after_authors) = split_authors(&working);
    let (title, remainder) = split_title(after_authors);
    let remainder = remainder.trim();

    // A year inside the remainder also bounds the place; one found only in
    // the title or author text is kept without a position.
    let (year, year_pos) = match last_year_with_config(remainder, config) {
        Some((year, pos)) => (year, Some(pos)),
        None => (
            last_year_with_config(&working, config)
                .map(|(year, _)| year)
                .unwrap_or_default(),
            None,
        ),
    };

    let place = extract_place(remainder, year_pos, config);

    PublicationRecord {
        title: clean_whitespace(title),
        authors: clean_whitespace(authors),
        place: clean_whitespace(&place),
        year,
        doi,
        category,
    }
}

/// Split off the author list. Without the separator there are no authors and
/// the whole text is the remainder.
fn split_authors(text: &str) -> (&str, &str) {
    match AUTHORS_RE.captures(text) {
        Some(caps) => {
            let authors = caps.get(1).map_or("", |m| m.as_str());
            let end = caps.get(0).map_or(0, |m| m.end());
            (authors, text[end..].trim())
        }
        None => ("", text),
    }
}

/// Title runs to the first `". "`, else to the first `"."`, else to the end.
fn split_title(remainder: &str) -> (&str, &str) {
    if remainder.is_empty() {
        return ("", "");
    }
    if let Some((title, rest)) = remainder.split_once(". ") {
        return (title.trim(), rest);
    }
    if let Some((title, rest)) = remainder.split_once('.') {
        return (title.trim(), rest.trim());
    }
    (remainder, "")
}

fn trim_place(place: &str) -> &str {
    let place = place.trim_matches(PLACE_TRIM);
    match place.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("in:") => place[3..].trim(),
        _ => place,
    }
}

fn extract_place(remainder: &str, year_pos: Option<usize>, config: &ParsingConfig) -> String {
    let before_year = match year_pos {
        Some(pos) => &remainder[..pos],
        None => remainder,
    };

    let mut place = trim_place(before_year);
    if place.is_empty() && !remainder.is_empty() {
        place = trim_place(remainder);
    }

    let lower = place.to_ascii_lowercase();
    if let Some(idx) = config
        .place_junk_markers()
        .iter()
        .find_map(|marker| lower.find(marker.as_str()))
    {
        place = place[..idx].trim_matches(PLACE_TRIM);
    }

    place.to_string()
}
