use lattes_core::config_file::ParsingSection;
use regex::Regex;

use crate::ParsingError;

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }

    fn push(&mut self, value: T) {
        match self {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(value),
            ListOverride::Default => *self = ListOverride::Extend(vec![value]),
        }
    }
}

/// Phrases that only appear in script/UI leakage, never in a citation.
pub(crate) const DEFAULT_JUNK_KEYWORDS: &[&str] = &[
    "ordenar por",
    "var ordenacao",
    "#artigos-completos",
    "span[data-tipo-ordenacao",
    "pagina gerada pelo sistema",
    "página gerada pelo sistema",
    "function(",
    "return (v1",
    "numerico_crescente",
    "numerico:",
];

/// Classes on a `div` sibling that end a category's entry list.
pub(crate) const DEFAULT_STOP_CLASSES: &[&str] = &["cita-artigos", "inst_back", "title-wrapper"];

/// Resolver text that leaks into the venue when a DOI link is malformed.
pub(crate) const DEFAULT_PLACE_JUNK_MARKERS: &[&str] = &["org.crossref"];

/// Configuration for the publication extraction pipeline.
///
/// Regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns. List
/// settings are resolved against their defaults once, at construction.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── identifiers.rs ──
    pub(crate) doi_re: Option<Regex>,
    pub(crate) year_re: Option<Regex>,

    // ── text_processing.rs ──
    /// Lowercased for substring matching.
    pub(crate) junk_keywords: Vec<String>,
    /// Fragments shorter than this many characters are junk (default: 10).
    pub(crate) min_text_chars: usize,
    /// Minimum share of letters in a fragment (default: 0.3).
    pub(crate) min_alpha_ratio: f64,

    // ── section.rs / entries.rs ──
    pub(crate) section_class: String,
    pub(crate) stop_classes: Vec<String>,
    pub(crate) entry_class: String,
    pub(crate) excluded_class: String,
    pub(crate) doi_link_class: String,

    // ── citation.rs ──
    /// ASCII-lowercased.
    pub(crate) place_junk_markers: Vec<String>,

    // ── fallback.rs ──
    /// Fragments without a year or DOI need more tokens than this (default: 8).
    pub(crate) fallback_min_tokens: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            doi_re: None,
            year_re: None,
            junk_keywords: resolve_junk_keywords(&ListOverride::Default),
            min_text_chars: 10,
            min_alpha_ratio: 0.3,
            section_class: "cita-artigos".to_string(),
            stop_classes: resolve_stop_classes(&ListOverride::Default),
            entry_class: "transform".to_string(),
            excluded_class: "informacao-artigo".to_string(),
            doi_link_class: "icone-doi".to_string(),
            place_junk_markers: resolve_place_junk_markers(&ListOverride::Default),
            fallback_min_tokens: 8,
        }
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn resolve_junk_keywords(keywords: &ListOverride<String>) -> Vec<String> {
    keywords
        .resolve(&owned(DEFAULT_JUNK_KEYWORDS))
        .into_iter()
        .map(|k| k.to_lowercase())
        .collect()
}

fn resolve_stop_classes(classes: &ListOverride<String>) -> Vec<String> {
    classes.resolve(&owned(DEFAULT_STOP_CLASSES))
}

fn resolve_place_junk_markers(markers: &ListOverride<String>) -> Vec<String> {
    markers
        .resolve(&owned(DEFAULT_PLACE_JUNK_MARKERS))
        .into_iter()
        .map(|m| m.to_ascii_lowercase())
        .collect()
}

impl ParsingConfig {
    /// Junk denylist, lowercased for substring matching.
    pub(crate) fn junk_keywords(&self) -> &[String] {
        &self.junk_keywords
    }

    pub(crate) fn stop_classes(&self) -> &[String] {
        &self.stop_classes
    }

    pub(crate) fn place_junk_markers(&self) -> &[String] {
        &self.place_junk_markers
    }

    /// Get the fallback minimum token count.
    pub fn fallback_min_tokens(&self) -> usize {
        self.fallback_min_tokens
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast if any pattern is invalid or a threshold is out of range.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    doi_re: Option<String>,
    year_re: Option<String>,
    junk_keywords: ListOverride<String>,
    min_text_chars: Option<usize>,
    min_alpha_ratio: Option<f64>,
    section_class: Option<String>,
    stop_classes: ListOverride<String>,
    entry_class: Option<String>,
    excluded_class: Option<String>,
    doi_link_class: Option<String>,
    place_junk_markers: ListOverride<String>,
    fallback_min_tokens: Option<usize>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Patterns ──

    pub fn doi_regex(mut self, pattern: &str) -> Self {
        self.doi_re = Some(pattern.to_string());
        self
    }

    pub fn year_regex(mut self, pattern: &str) -> Self {
        self.year_re = Some(pattern.to_string());
        self
    }

    // ── Junk classifier ──

    pub fn set_junk_keywords(mut self, keywords: Vec<String>) -> Self {
        self.junk_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_junk_keyword(mut self, keyword: String) -> Self {
        self.junk_keywords.push(keyword);
        self
    }

    pub fn min_text_chars(mut self, n: usize) -> Self {
        self.min_text_chars = Some(n);
        self
    }

    pub fn min_alpha_ratio(mut self, ratio: f64) -> Self {
        self.min_alpha_ratio = Some(ratio);
        self
    }

    // ── Markup classes ──

    pub fn section_class(mut self, class: &str) -> Self {
        self.section_class = Some(class.to_string());
        self
    }

    pub fn set_stop_classes(mut self, classes: Vec<String>) -> Self {
        self.stop_classes = ListOverride::Replace(classes);
        self
    }

    pub fn add_stop_class(mut self, class: String) -> Self {
        self.stop_classes.push(class);
        self
    }

    pub fn entry_class(mut self, class: &str) -> Self {
        self.entry_class = Some(class.to_string());
        self
    }

    pub fn excluded_class(mut self, class: &str) -> Self {
        self.excluded_class = Some(class.to_string());
        self
    }

    pub fn doi_link_class(mut self, class: &str) -> Self {
        self.doi_link_class = Some(class.to_string());
        self
    }

    // ── Place cleanup ──

    pub fn set_place_junk_markers(mut self, markers: Vec<String>) -> Self {
        self.place_junk_markers = ListOverride::Replace(markers);
        self
    }

    pub fn add_place_junk_marker(mut self, marker: String) -> Self {
        self.place_junk_markers.push(marker);
        self
    }

    // ── Fallback ──

    pub fn fallback_min_tokens(mut self, n: usize) -> Self {
        self.fallback_min_tokens = Some(n);
        self
    }

    /// Apply the `[parsing]` section of a config file on top of this builder.
    pub fn apply_file_section(mut self, section: &ParsingSection) -> Self {
        if let Some(keywords) = &section.extra_junk_keywords {
            for k in keywords {
                self = self.add_junk_keyword(k.clone());
            }
        }
        if let Some(n) = section.min_text_chars {
            self = self.min_text_chars(n);
        }
        if let Some(r) = section.min_alpha_ratio {
            self = self.min_alpha_ratio(r);
        }
        if let Some(n) = section.fallback_min_tokens {
            self = self.fallback_min_tokens(n);
        }
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, ParsingError> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };

        let min_alpha_ratio = self.min_alpha_ratio.unwrap_or(0.3);
        if !(0.0..=1.0).contains(&min_alpha_ratio) {
            return Err(ParsingError::InvalidThreshold(format!(
                "min_alpha_ratio must be within 0.0..=1.0, got {min_alpha_ratio}"
            )));
        }

        let defaults = ParsingConfig::default();
        Ok(ParsingConfig {
            doi_re: compile(self.doi_re)?,
            year_re: compile(self.year_re)?,
            junk_keywords: resolve_junk_keywords(&self.junk_keywords),
            min_text_chars: self.min_text_chars.unwrap_or(defaults.min_text_chars),
            min_alpha_ratio,
            section_class: self.section_class.unwrap_or(defaults.section_class),
            stop_classes: resolve_stop_classes(&self.stop_classes),
            entry_class: self.entry_class.unwrap_or(defaults.entry_class),
            excluded_class: self.excluded_class.unwrap_or(defaults.excluded_class),
            doi_link_class: self.doi_link_class.unwrap_or(defaults.doi_link_class),
            place_junk_markers: resolve_place_junk_markers(&self.place_junk_markers),
            fallback_min_tokens: self
                .fallback_min_tokens
                .unwrap_or(defaults.fallback_min_tokens),
        })
    }
}
