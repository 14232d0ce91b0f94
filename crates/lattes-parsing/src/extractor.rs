use scraper::Html;

use crate::citation::parse_entry_text_with_config;
use crate::config::ParsingConfig;
use crate::entries::EntryIter;
use crate::fallback::fallback_extract_with_config;
use crate::section::{SectionHeader, find_section_header_with_config};
use crate::{
    Category, ExtractionResult, ExtractionStage, ExtractionStats, PublicationRecord, RawEntry,
};

/// Configurable publication extractor.
///
/// Each pipeline step is a separate method so callers can run them
/// individually or use [`extract()`](Self::extract) for the full pipeline.
#[derive(Debug, Clone, Default)]
pub struct PublicationExtractor {
    config: ParsingConfig,
}

impl PublicationExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with the given configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Locate a category's section header.
    pub fn find_section<'a>(&self, document: &'a Html, category: Category) -> Option<SectionHeader<'a>> {
        find_section_header_with_config(document, category, &self.config)
    }

    /// Iterate the raw entries following a section header.
    pub fn entries<'a>(&'a self, header: SectionHeader<'a>) -> EntryIter<'a> {
        EntryIter::new(header.element, &self.config)
    }

    /// Turn one raw entry into a record. A DOI found in the citation text
    /// takes precedence over the one from the entry's DOI link.
    pub fn parse_entry(&self, entry: RawEntry, category: Category) -> PublicationRecord {
        let mut record = parse_entry_text_with_config(&entry.text, category, &self.config);
        if record.doi.is_none() {
            record.doi = entry.explicit_doi;
        }
        record
    }

    /// Markup-level extraction for when the structured walk finds nothing.
    pub fn fallback(&self, html: &str, stats: &mut ExtractionStats) -> Vec<PublicationRecord> {
        fallback_extract_with_config(html, &self.config, stats)
    }

    /// Run the full pipeline on one document.
    pub fn extract(&self, html: &str) -> ExtractionResult {
        let document = Html::parse_document(html);
        let mut stats = ExtractionStats::default();
        let mut records = Vec::new();

        for category in Category::ALL {
            let Some(header) = self.find_section(&document, category) else {
                tracing::debug!(category = %category, "section not found");
                stats.sections_missing += 1;
                continue;
            };
            tracing::debug!(category = %category, method = ?header.method, "section located");
            stats.sections_found += 1;

            let mut entries = self.entries(header);
            let before = records.len();
            records.extend(
                entries
                    .by_ref()
                    .map(|entry| self.parse_entry(entry, category)),
            );
            stats.entries_collected += records.len() - before;
            stats.junk_dropped += entries.junk_dropped();
        }

        let stage = if records.is_empty() {
            tracing::debug!("no structured entries, falling back to markup scan");
            records = self.fallback(html, &mut stats);
            ExtractionStage::Fallback
        } else {
            ExtractionStage::Structured
        };

        tracing::info!(records = records.len(), stage = ?stage, "extraction finished");
        ExtractionResult {
            records,
            stage,
            stats,
        }
    }
}
