use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

/// Collapse every whitespace run (spaces, tabs, newlines) to a single space
/// and trim both ends.
pub fn clean_whitespace(text: &str) -> String {
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    WS_RE.replace_all(text.trim(), " ").into_owned()
}

/// Letters counted by the junk ratio: ASCII plus Latin-1 accented letters.
fn is_latin_letter(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | 'À'..='Ö' | 'Ø'..='ö' | 'ø'..='ÿ')
}

/// Decide whether a text fragment is page noise rather than a citation.
///
/// A fragment is junk when it is empty, contains a denylisted phrase
/// (sorting widgets, inline script, CSS selectors, the page footer),
/// is shorter than 10 characters, or is less than 30% letters.
pub fn is_junk_text(text: &str) -> bool {
    is_junk_text_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`is_junk_text`].
pub(crate) fn is_junk_text_with_config(text: &str, config: &ParsingConfig) -> bool {
    if text.is_empty() {
        return true;
    }

    let lower = text.to_lowercase();
    if config
        .junk_keywords()
        .iter()
        .any(|k| lower.contains(k.as_str()))
    {
        return true;
    }

    let len = text.chars().count();
    if len < config.min_text_chars {
        return true;
    }

    let letters = text.chars().filter(|&c| is_latin_letter(c)).count();
    (letters as f64 / len.max(1) as f64) < config.min_alpha_ratio
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_whitespace() {
        assert_eq!(clean_whitespace("  a \n\t b  "), "a b");
        assert_eq!(clean_whitespace(""), "");
        assert_eq!(clean_whitespace(" \n "), "");
        assert_eq!(clean_whitespace("SILVA,\n  J."), "SILVA, J.");
    }

    #[test]
    fn test_junk_empty() {
        assert!(is_junk_text(""));
    }

    #[test]
    fn test_junk_short() {
        assert!(is_junk_text("abcdefghi"));
        assert!(is_junk_text("Revista"));
    }

    #[test]
    fn test_junk_keyword_any_length() {
        assert!(is_junk_text("function("));
        let long = format!("{} function(a, b) {{ return a - b; }}", "texto ".repeat(20));
        assert!(is_junk_text(&long));
        assert!(is_junk_text("Ordenar por: Ordem Cronológica"));
        assert!(is_junk_text("Página gerada pelo Sistema Currículo Lattes em 01/02/2024"));
        assert!(is_junk_text("Pagina gerada pelo Sistema Curriculo Lattes em 01/02/2024"));
    }

    #[test]
    fn test_junk_low_letter_ratio() {
        assert!(is_junk_text("12345 / 678 - 90 ; 11 : 22"));
    }

    #[test]
    fn test_not_junk_sixty_percent_letters() {
        let text = format!("{}{}", "abcdefghijklmnopqrstuvwx", "1234567890123456");
        assert_eq!(text.chars().count(), 40);
        assert!(!is_junk_text(&text));
    }

    #[test]
    fn test_accented_letters_count() {
        assert!(!is_junk_text("Ação, São, Pará; Ém, 12"));
    }

    #[test]
    fn test_real_citation_not_junk() {
        assert!(!is_junk_text(
            "SILVA, J. . A Study of X . Journal of Y, v. 3, p. 10-20, 2021."
        ));
    }

    #[test]
    fn test_custom_threshold() {
        use crate::ParsingConfigBuilder;
        let config = ParsingConfigBuilder::new().min_text_chars(3).build().unwrap();
        assert!(!is_junk_text_with_config("Revista", &config));
        assert!(is_junk_text_with_config("Re", &config));
    }
}
