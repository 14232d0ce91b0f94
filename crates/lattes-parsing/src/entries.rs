use scraper::{ElementRef, Node};

use crate::RawEntry;
use crate::config::ParsingConfig;
use crate::identifiers::{doi_re, extract_doi_with_config};
use crate::section::{CONTAINER_TAG, has_class};
use crate::text_processing::is_junk_text_with_config;

fn is_script_or_style(element: &ElementRef<'_>) -> bool {
    matches!(element.value().name(), "script" | "style")
}

/// Lazy iterator over the citation entries that follow a section header.
///
/// Walks the header's following element siblings in document order, skipping
/// anything without a citation span, and stops for good at the next section
/// boundary. Not restartable: build a new one to walk again.
pub struct EntryIter<'a> {
    siblings: Box<dyn Iterator<Item = ElementRef<'a>> + 'a>,
    config: &'a ParsingConfig,
    finished: bool,
    junk_dropped: usize,
}

impl<'a> EntryIter<'a> {
    pub fn new(header: ElementRef<'a>, config: &'a ParsingConfig) -> Self {
        Self {
            siblings: Box::new(header.next_siblings().filter_map(ElementRef::wrap)),
            config,
            finished: false,
            junk_dropped: 0,
        }
    }

    /// Number of citation spans discarded as junk so far.
    pub fn junk_dropped(&self) -> usize {
        self.junk_dropped
    }

    fn is_boundary(&self, element: &ElementRef<'_>) -> bool {
        element.value().name() == CONTAINER_TAG
            && self.config.stop_classes().iter().any(|c| has_class(element, c))
    }

    fn citation_span(&self, element: ElementRef<'a>) -> Option<ElementRef<'a>> {
        element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "span" && has_class(el, &self.config.entry_class))
    }

    fn entry_text(&self, span: ElementRef<'_>) -> String {
        let mut parts = Vec::new();
        self.push_text(span, &mut parts);
        parts.join(" ")
    }

    fn push_text<'s>(&self, element: ElementRef<'s>, parts: &mut Vec<&'s str>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed);
                    }
                }
                Node::Element(_) => {
                    let Some(el) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if is_script_or_style(&el) || has_class(&el, &self.config.excluded_class) {
                        continue;
                    }
                    self.push_text(el, parts);
                }
                _ => {}
            }
        }
    }

    fn explicit_doi(&self, span: ElementRef<'_>, text: &str) -> Option<String> {
        let from_link = span
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "a" && has_class(el, &self.config.doi_link_class))
            .filter_map(|el| el.value().attr("href"))
            .find_map(|href| doi_re(self.config).find(href))
            .map(|m| m.as_str().to_string());

        from_link.or_else(|| extract_doi_with_config(text, self.config))
    }
}

impl Iterator for EntryIter<'_> {
    type Item = RawEntry;

    fn next(&mut self) -> Option<RawEntry> {
        if self.finished {
            return None;
        }

        while let Some(sibling) = self.siblings.next() {
            if self.is_boundary(&sibling) {
                tracing::trace!(tag = sibling.value().name(), "section boundary");
                self.finished = true;
                return None;
            }
            if is_script_or_style(&sibling) {
                continue;
            }
            let Some(span) = self.citation_span(sibling) else {
                continue;
            };

            let text = self.entry_text(span);
            if is_junk_text_with_config(&text, self.config) {
                if !text.is_empty() {
                    tracing::trace!(text = %text, "dropping junk entry");
                    self.junk_dropped += 1;
                }
                continue;
            }

            let explicit_doi = self.explicit_doi(span, &text);
            return Some(RawEntry { text, explicit_doi });
        }

        self.finished = true;
        None
    }
}
