//! Markup-level extraction for pages whose element structure is unrecognized.
//!
//! Works on the raw HTML string with substring search and regexes only: the
//! category labels split the page into blocks, and each block is cut into
//! citation-sized fragments along list items, line breaks and blank lines.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::citation::parse_entry_text_with_config;
use crate::config::ParsingConfig;
use crate::identifiers::{doi_re, year_re};
use crate::text_processing::{clean_whitespace, is_junk_text_with_config};
use crate::{Category, ExtractionStats, PublicationRecord};

static SCRIPT_STYLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>").unwrap()
});

static FRAGMENT_SPLIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<\s*/?\s*li\b[^>]*>|<\s*br\s*/?\s*>|\n\s*\n").unwrap()
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// `1.` / `1)` style item numbers, preceded by start-of-text or whitespace
/// and followed by text that does not open with a digit.
static ITEM_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(\d{1,3})[.)]\s+([^\d\s])").unwrap());

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    // Last, so `&amp;lt;` decodes to `&lt;` and not `<`.
    ("&amp;", "&"),
];

/// The markup following each category label, in document order.
///
/// A block runs from the end of its label to the start of the next located
/// label (or the end of the document). Categories whose label does not occur
/// are absent.
pub fn locate_blocks(html: &str) -> Vec<(Category, &str)> {
    let mut located: Vec<(Category, usize, usize)> = Category::ALL
        .into_iter()
        .filter_map(|category| {
            let pattern = format!("(?i){}", regex::escape(category.label()));
            let re = Regex::new(&pattern).ok()?;
            re.find(html).map(|m| (category, m.start(), m.end()))
        })
        .collect();
    located.sort_by_key(|&(_, start, _)| start);

    located
        .iter()
        .enumerate()
        .map(|(i, &(category, _, end))| {
            let block_end = located
                .get(i + 1)
                .map_or(html.len(), |&(_, next_start, _)| next_start)
                .max(end);
            (category, &html[end..block_end])
        })
        .collect()
}

/// Cut a block at the first stop class, backing up to the `<` of the tag
/// that carries it.
fn truncate_at_stop<'a>(block: &'a str, stop_classes: &[String]) -> &'a str {
    let Some(idx) = stop_classes
        .iter()
        .filter_map(|class| block.find(class.as_str()))
        .min()
    else {
        return block;
    };
    let cut = block[..idx].rfind('<').unwrap_or(idx);
    &block[..cut]
}

fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, ch)| acc.replace(entity, ch))
}

/// Split `1. first ... 2. second ...` into its items, numbers removed.
///
/// Only applies when the fragment opens with item `1`. Later numbers must
/// follow in sequence and close the previous item's sentence, so volume or
/// page numbers such as `n. 2. 2010` are left alone.
fn split_numbered(fragment: &str) -> Vec<String> {
    let mut cuts: Vec<(usize, usize)> = Vec::new();
    let mut expected = 1u32;
    for caps in ITEM_NUMBER_RE.captures_iter(fragment) {
        let (Some(whole), Some(number), Some(body)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if cuts.is_empty() && whole.start() != 0 {
            break;
        }
        if number.as_str().parse::<u32>().ok() != Some(expected) {
            continue;
        }
        if !cuts.is_empty() && !fragment[..whole.start()].trim_end().ends_with('.') {
            continue;
        }
        cuts.push((whole.start(), body.start()));
        expected += 1;
    }

    if cuts.is_empty() {
        return vec![fragment.to_string()];
    }

    cuts.iter()
        .enumerate()
        .map(|(i, &(_, body_start))| {
            let body_end = cuts.get(i + 1).map_or(fragment.len(), |&(next, _)| next);
            clean_whitespace(&fragment[body_start..body_end])
        })
        .filter(|item| !item.is_empty())
        .collect()
}

fn looks_like_citation(fragment: &str, config: &ParsingConfig) -> bool {
    year_re(config).is_match(fragment)
        || doi_re(config).is_match(fragment)
        || fragment.split_whitespace().count() > config.fallback_min_tokens
}

/// Candidate citation strings within one block.
pub(crate) fn block_fragments(
    block: &str,
    config: &ParsingConfig,
    stats: &mut ExtractionStats,
) -> Vec<String> {
    let block = truncate_at_stop(block, config.stop_classes());
    let block = SCRIPT_STYLE_RE.replace_all(block, " ");

    let mut fragments = Vec::new();
    for piece in FRAGMENT_SPLIT_RE.split(&block) {
        let text = clean_whitespace(&decode_entities(&TAG_RE.replace_all(piece, " ")));
        if text.is_empty() {
            continue;
        }
        if is_junk_text_with_config(&text, config) {
            tracing::trace!(text = %text, "dropping junk fragment");
            stats.junk_dropped += 1;
            continue;
        }
        fragments.extend(
            split_numbered(&text)
                .into_iter()
                .filter(|item| looks_like_citation(item, config)),
        );
    }
    fragments
}

/// Extract records from raw markup without relying on element structure.
pub fn fallback_extract(html: &str) -> Vec<PublicationRecord> {
    let mut stats = ExtractionStats::default();
    fallback_extract_with_config(html, &ParsingConfig::default(), &mut stats)
}

/// Config-aware version of [`fallback_extract`] that also fills in stats.
pub(crate) fn fallback_extract_with_config(
    html: &str,
    config: &ParsingConfig,
    stats: &mut ExtractionStats,
) -> Vec<PublicationRecord> {
    let mut blocks = locate_blocks(html);
    // Output order is by category, not by where the labels sit on the page.
    blocks.sort_by_key(|(category, _)| {
        Category::ALL.iter().position(|c| c == category).unwrap_or(usize::MAX)
    });

    let mut records = Vec::new();
    for (category, block) in blocks {
        let fragments = block_fragments(block, config, stats);
        tracing::debug!(category = %category, fragments = fragments.len(), "fallback block");
        stats.fallback_fragments += fragments.len();
        records.extend(
            fragments
                .iter()
                .map(|f| parse_entry_text_with_config(f, category, config)),
        );
    }
    records
}
