use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config_file;

/// One of the three publication categories listed on a curriculum page.
///
/// The serialized form is the category's Portuguese label, which is also the
/// heading text used to locate the section when no anchor is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Artigos completos publicados em periódicos")]
    JournalArticle,
    #[serde(rename = "Capítulos de livros publicados")]
    BookChapter,
    #[serde(rename = "Trabalhos completos publicados em anais de congressos")]
    ConferencePaper,
}

impl Category {
    /// All categories, in output order.
    pub const ALL: [Category; 3] = [
        Category::JournalArticle,
        Category::BookChapter,
        Category::ConferencePaper,
    ];

    /// Literal section heading as printed on the page.
    pub fn label(self) -> &'static str {
        match self {
            Category::JournalArticle => "Artigos completos publicados em periódicos",
            Category::BookChapter => "Capítulos de livros publicados",
            Category::ConferencePaper => "Trabalhos completos publicados em anais de congressos",
        }
    }

    /// `name` attribute of the `<a>` anchor that precedes the section.
    pub fn anchor(self) -> Option<&'static str> {
        match self {
            Category::JournalArticle => Some("ArtigosCompletos"),
            Category::BookChapter => Some("LivrosCapitulos"),
            Category::ConferencePaper => Some("TrabalhosPublicadosAnaisCongresso"),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s.trim())
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

/// A structured bibliographic record extracted from one citation entry.
///
/// Missing text fields are empty strings; a missing DOI serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub title: String,
    pub authors: String,
    pub place: String,
    /// Four-digit year exactly as matched, or empty.
    pub year: String,
    pub doi: Option<String>,
    #[serde(rename = "class")]
    pub category: Category,
}

/// Citation text pulled out of the document before field parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub text: String,
    /// DOI taken from the entry's DOI link (or its text), if any.
    pub explicit_doi: Option<String>,
}

/// Which pipeline produced an [`ExtractionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionStage {
    /// Element/class walk over the parsed document.
    #[default]
    Structured,
    /// Tag-stripping over the raw markup string.
    Fallback,
}

/// Counters describing an extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub sections_found: usize,
    pub sections_missing: usize,
    pub entries_collected: usize,
    pub junk_dropped: usize,
    pub fallback_fragments: usize,
}

/// Result of extracting publications from one document.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub records: Vec<PublicationRecord>,
    pub stage: ExtractionStage,
    pub stats: ExtractionStats,
}

impl ExtractionResult {
    /// Number of records for the given category.
    pub fn count_for(&self, category: Category) -> usize {
        self.records
            .iter()
            .filter(|r| r.category == category)
            .count()
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unknown publication category: {0:?}")]
    UnknownCategory(String),
}
