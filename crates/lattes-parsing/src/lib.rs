use thiserror::Error;

pub mod citation;
pub mod config;
pub mod entries;
pub mod extractor;
pub mod fallback;
pub mod identifiers;
pub mod section;
pub mod text_processing;

pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use entries::EntryIter;
pub use extractor::PublicationExtractor;
// Re-export domain types from core (canonical definitions live there)
pub use lattes_core::{
    Category, ExtractionResult, ExtractionStage, ExtractionStats, PublicationRecord, RawEntry,
};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
}

/// Extract publication records from a curriculum page.
///
/// Pipeline:
/// 1. Parse the HTML leniently into a document tree
/// 2. For each category, locate its section (anchor, then heading text)
/// 3. Walk the section's siblings collecting citation spans
/// 4. Parse each citation into title, authors, place, year and DOI
/// 5. If nothing was found anywhere, strip tags from the raw markup and retry
///
/// Never fails: an unrecognizable page yields an empty record list.
pub fn extract_publications(html: &str) -> ExtractionResult {
    PublicationExtractor::new().extract(html)
}
