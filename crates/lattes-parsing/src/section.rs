use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

use crate::Category;
use crate::config::ParsingConfig;

/// Element that carries a section heading.
pub(crate) const CONTAINER_TAG: &str = "div";

/// How a section header was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateMethod {
    /// Via the category's named `<a>` anchor.
    Anchor,
    /// Via a text node containing the category label.
    Heading,
}

/// The element marking the start of a category's section.
#[derive(Debug, Clone, Copy)]
pub struct SectionHeader<'a> {
    pub element: ElementRef<'a>,
    pub method: LocateMethod,
}

pub(crate) fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn is_container(element: &ElementRef<'_>) -> bool {
    element.value().name() == CONTAINER_TAG
}

/// Locate the header element of a category's section.
///
/// Tries the category's named anchor first and walks up to the enclosing
/// section `div`; falls back to scanning text nodes for the category label.
/// Returns `None` when neither works, which callers treat as an empty section.
pub fn find_section_header<'a>(document: &'a Html, category: Category) -> Option<SectionHeader<'a>> {
    find_section_header_with_config(document, category, &ParsingConfig::default())
}

/// Config-aware version of [`find_section_header`].
pub(crate) fn find_section_header_with_config<'a>(
    document: &'a Html,
    category: Category,
    config: &ParsingConfig,
) -> Option<SectionHeader<'a>> {
    if let Some(element) = category
        .anchor()
        .and_then(|name| find_by_anchor(document, name, &config.section_class))
    {
        return Some(SectionHeader {
            element,
            method: LocateMethod::Anchor,
        });
    }

    find_by_label(document, category.label()).map(|element| SectionHeader {
        element,
        method: LocateMethod::Heading,
    })
}

fn find_by_anchor<'a>(document: &'a Html, name: &str, section_class: &str) -> Option<ElementRef<'a>> {
    static ANCHOR_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a[name]").unwrap());

    let anchor = document
        .select(&ANCHOR_SEL)
        .find(|a| a.value().attr("name") == Some(name))?;

    std::iter::once(anchor)
        .chain(anchor.ancestors().filter_map(ElementRef::wrap))
        .find(|el| is_container(el) && has_class(el, section_class))
}

fn find_by_label<'a>(document: &'a Html, label: &str) -> Option<ElementRef<'a>> {
    let needle = label.to_lowercase();

    let text_node = document.tree.root().descendants().find(|node| match node.value() {
        Node::Text(text) => {
            let trimmed = text.trim();
            !trimmed.is_empty() && trimmed.to_lowercase().contains(&needle)
        }
        _ => false,
    })?;

    // The first matching text decides; a label outside any container means
    // the section cannot be located.
    text_node
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(is_container)
}
