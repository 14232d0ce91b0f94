//! Property tests: the pipeline is total and its output always well-formed.

use lattes_parsing::citation::parse_entry_text;
use lattes_parsing::text_processing::{clean_whitespace, is_junk_text};
use lattes_parsing::{Category, PublicationRecord, extract_publications};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use regex::Regex;

static DOI_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?i)10\.\d{4,9}/[^\s,;"'<>]+$"#).unwrap());

/// Markup built from the pieces the extractor reacts to.
fn lattes_like_markup() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        Just("<div class=\"cita-artigos\">".to_string()),
        Just("<a name=\"ArtigosCompletos\"></a>".to_string()),
        Just("<a name=\"LivrosCapitulos\"></a>".to_string()),
        Just("<span class=\"transform\">".to_string()),
        Just("<span class=\"informacao-artigo\">".to_string()),
        Just("<a class=\"icone-doi\" href=\"https://doi.org/10.1234/abc\">".to_string()),
        Just("<div class=\"inst_back\">".to_string()),
        Just("</span>".to_string()),
        Just("</div>".to_string()),
        Just("<li>".to_string()),
        Just("<br>".to_string()),
        Just("Artigos completos publicados em periódicos".to_string()),
        Just("Trabalhos completos publicados em anais de congressos".to_string()),
        Just(" . ".to_string()),
        "[A-Za-zÀ-ÿ ,.;:]{0,30}",
        "(19|20)[0-9]{2}",
        "10\\.[0-9]{4,9}/[a-z0-9.\\-]{1,12}",
    ];
    proptest::collection::vec(piece, 0..40).prop_map(|parts| parts.concat())
}

fn assert_well_formed(records: &[PublicationRecord]) {
    for r in records {
        assert!(Category::ALL.contains(&r.category));
        if let Some(doi) = &r.doi {
            assert!(DOI_SHAPE.is_match(doi), "bad doi {doi:?}");
        }
        assert!(
            r.year.is_empty() || r.year.chars().count() == 4,
            "bad year {:?}",
            r.year
        );
    }
}

proptest! {
    #[test]
    fn test_arbitrary_text_never_panics(s in ".*") {
        let result = extract_publications(&s);
        assert_well_formed(&result.records);
    }

    #[test]
    fn test_lattes_like_markup_well_formed(html in lattes_like_markup()) {
        let result = extract_publications(&html);
        assert_well_formed(&result.records);
    }

    #[test]
    fn test_extraction_is_deterministic(html in lattes_like_markup()) {
        prop_assert_eq!(extract_publications(&html).records, extract_publications(&html).records);
    }

    #[test]
    fn test_json_round_trip(html in lattes_like_markup()) {
        let records = extract_publications(&html).records;
        let json = serde_json::to_string(&records).unwrap();
        let back: Vec<PublicationRecord> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, records);
    }

    #[test]
    fn test_parse_entry_total(s in ".*") {
        let rec = parse_entry_text(&s, Category::BookChapter);
        prop_assert_eq!(rec.category, Category::BookChapter);
        prop_assert_eq!(clean_whitespace(&rec.title), rec.title.clone());
        assert_well_formed(std::slice::from_ref(&rec));
    }

    #[test]
    fn test_clean_whitespace_idempotent(s in ".*") {
        let once = clean_whitespace(&s);
        prop_assert_eq!(clean_whitespace(&once), once.clone());
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
        prop_assert!(!once.contains("  "));
    }

    #[test]
    fn test_short_text_always_junk(s in ".{0,9}") {
        prop_assert!(is_junk_text(&s));
    }

    #[test]
    fn test_function_keyword_always_junk(prefix in ".{0,40}", suffix in ".{0,40}") {
        let text = format!("{prefix}function({suffix}");
        prop_assert!(is_junk_text(&text));
    }
}
