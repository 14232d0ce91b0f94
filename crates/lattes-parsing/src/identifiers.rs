use once_cell::sync::Lazy;
use regex::{Match, Regex};

use crate::config::ParsingConfig;

/// `10.` + 4-9 digit registrant + `/` + suffix up to whitespace, `,`, `;`,
/// quotes or angle brackets.
static DOI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)10\.\d{4,9}/[^\s,;"'<>]+"#).unwrap());

/// A standalone year in the 1900s or 2000s.
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

pub(crate) fn doi_re(config: &ParsingConfig) -> &Regex {
    config.doi_re.as_ref().unwrap_or(&DOI_RE)
}

pub(crate) fn year_re(config: &ParsingConfig) -> &Regex {
    config.year_re.as_ref().unwrap_or(&YEAR_RE)
}

/// Extract the first DOI from a string.
///
/// Handles bare DOIs as well as resolver URLs and `doi:` prefixes, since only
/// the `10.NNNN/suffix` part is matched:
/// - `10.1234/example`
/// - `https://doi.org/10.1234/example`
/// - `DOI: 10.1234/example`
pub fn extract_doi(text: &str) -> Option<String> {
    extract_doi_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`extract_doi`].
pub(crate) fn extract_doi_with_config(text: &str, config: &ParsingConfig) -> Option<String> {
    find_doi(text, config).map(|m| m.as_str().to_string())
}

/// Location of the first DOI in `text`.
pub(crate) fn find_doi<'t>(text: &'t str, config: &ParsingConfig) -> Option<Match<'t>> {
    doi_re(config).find(text)
}

/// The last year in `text` with its byte offset.
///
/// Citations put the year after the venue, so when several years appear
/// (e.g. an edition year and the publication year) the last one wins.
pub fn last_year(text: &str) -> Option<(String, usize)> {
    last_year_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`last_year`].
pub(crate) fn last_year_with_config(text: &str, config: &ParsingConfig) -> Option<(String, usize)> {
    year_re(config)
        .find_iter(text)
        .last()
        .map(|m| (m.as_str().to_string(), m.start()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_doi_bare() {
        assert_eq!(
            extract_doi("Journal of Y, 2021. 10.1000/xyz123"),
            Some("10.1000/xyz123".to_string())
        );
    }

    #[test]
    fn test_extract_doi_from_resolver_url() {
        assert_eq!(
            extract_doi("see https://doi.org/10.1234/abcd.5678 for details"),
            Some("10.1234/abcd.5678".to_string())
        );
        assert_eq!(
            extract_doi("... doi.org/10.1234/abcd.5678 ..."),
            Some("10.1234/abcd.5678".to_string())
        );
    }

    #[test]
    fn test_extract_doi_stops_at_delimiters() {
        assert_eq!(
            extract_doi("10.1590/s0100-204x2019;p. 3"),
            Some("10.1590/s0100-204x2019".to_string())
        );
        assert_eq!(
            extract_doi(r#"href="10.1016/j.foo.2020.01.002">"#),
            Some("10.1016/j.foo.2020.01.002".to_string())
        );
        assert_eq!(
            extract_doi("10.1000/abc, 2020"),
            Some("10.1000/abc".to_string())
        );
    }

    #[test]
    fn test_extract_doi_first_wins() {
        assert_eq!(
            extract_doi("10.1111/first 10.2222/second"),
            Some("10.1111/first".to_string())
        );
    }

    #[test]
    fn test_extract_doi_registrant_length() {
        assert_eq!(extract_doi("10.123/short"), None);
        assert_eq!(extract_doi("10.1234567890/toolong"), None);
        assert!(extract_doi("DOI: 10.123456789/ok").is_some());
    }

    #[test]
    fn test_extract_doi_case_insensitive_prefix() {
        assert_eq!(
            extract_doi("DOI:10.1000/ABC.def"),
            Some("10.1000/ABC.def".to_string())
        );
    }

    #[test]
    fn test_last_year_wins() {
        let text = "São Paulo, 2019, 2020";
        let (year, pos) = last_year(text).unwrap();
        assert_eq!(year, "2020");
        assert_eq!(&text[..pos], "São Paulo, 2019, ");
    }

    #[test]
    fn test_year_whole_word_only() {
        assert_eq!(last_year("ISBN 9788520012345"), None);
        assert_eq!(last_year("p. 1850-1870"), None);
        assert_eq!(last_year("v. 12, 1999a"), None);
        assert_eq!(last_year("(2005)").map(|(y, _)| y), Some("2005".to_string()));
    }
}
