//! End-to-end extraction over a saved curriculum page.

use lattes_parsing::{
    Category, ExtractionStage, ParsingConfigBuilder, PublicationExtractor, PublicationRecord,
    extract_publications,
};

const SAMPLE: &str = include_str!("fixtures/lattes_sample.html");

fn by_title<'a>(records: &'a [PublicationRecord], title: &str) -> &'a PublicationRecord {
    records
        .iter()
        .find(|r| r.title == title)
        .unwrap_or_else(|| panic!("no record titled {title:?} in {records:#?}"))
}

#[test]
fn sample_counts_per_category() {
    let result = extract_publications(SAMPLE);
    assert_eq!(result.stage, ExtractionStage::Structured);
    assert_eq!(result.records.len(), 7);
    assert_eq!(result.count_for(Category::JournalArticle), 3);
    assert_eq!(result.count_for(Category::BookChapter), 2);
    assert_eq!(result.count_for(Category::ConferencePaper), 2);

    assert_eq!(result.stats.sections_found, 3);
    assert_eq!(result.stats.sections_missing, 0);
    assert_eq!(result.stats.entries_collected, 7);
    assert_eq!(result.stats.junk_dropped, 1);
    assert_eq!(result.stats.fallback_fragments, 0);
}

#[test]
fn sample_preserves_category_then_document_order() {
    let result = extract_publications(SAMPLE);
    let titles: Vec<&str> = result.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Produtividade de soja no cerrado",
            "Irrigação por gotejamento em hortaliças",
            "Modelagem de dados climáticos",
            "Manejo integrado de pragas",
            "Solos tropicais",
            "Sensoriamento remoto aplicado",
            "Redes de sensores no campo",
        ]
    );
}

#[test]
fn sample_journal_article_fields() {
    let result = extract_publications(SAMPLE);

    let first = by_title(&result.records, "Produtividade de soja no cerrado");
    assert_eq!(first.authors, "SILVA, J. A.; SOUZA, M.");
    assert_eq!(first.place, "Pesquisa Agropecuária Brasileira, v. 54, p. 1-10");
    assert_eq!(first.year, "2019");
    // Only the DOI link carries it.
    assert_eq!(first.doi.as_deref(), Some("10.1590/S0100-204X2019000100001"));

    let second = by_title(&result.records, "Irrigação por gotejamento em hortaliças");
    assert_eq!(second.place, "Revista Ceres, v. 66, n. 2, p. 100-110");
    assert_eq!(second.year, "2020");
    assert_eq!(second.doi, None);

    let third = by_title(&result.records, "Modelagem de dados climáticos");
    assert_eq!(third.place, "Ciência Rural, v. 48");
    assert_eq!(third.year, "2018");
    assert_eq!(third.doi.as_deref(), Some("10.1590/0103-8478cr20170001"));
}

#[test]
fn sample_chapter_and_conference_fields() {
    let result = extract_publications(SAMPLE);

    let chapter = by_title(&result.records, "Solos tropicais");
    assert_eq!(chapter.category, Category::BookChapter);
    assert_eq!(chapter.place, "Manual de Solos. São Paulo: Blucher");
    assert_eq!(chapter.year, "2016");

    let edited = by_title(&result.records, "Manejo integrado de pragas");
    assert!(edited.place.starts_with("Pereira, A.."), "{}", edited.place);
    assert_eq!(edited.year, "2017");

    let paper = by_title(&result.records, "Redes de sensores no campo");
    assert_eq!(paper.category, Category::ConferencePaper);
    assert_eq!(paper.year, "2014");
    assert_eq!(
        paper.place,
        "Congresso Brasileiro de Agricultura de Precisão, 2014, São Pedro. Anais do ConBAP"
    );
}

#[test]
fn sample_stops_before_unrelated_section() {
    let result = extract_publications(SAMPLE);
    assert!(
        result
            .records
            .iter()
            .all(|r| !r.title.contains("Resumo que não entra"))
    );
}

#[test]
fn sample_info_blocks_never_reach_fields() {
    let result = extract_publications(SAMPLE);
    for r in &result.records {
        assert!(!r.place.contains("JCR"), "{r:?}");
        assert!(!r.title.contains("Ordenar"), "{r:?}");
    }
}

#[test]
fn sample_json_shape() {
    let result = extract_publications(SAMPLE);
    let value = serde_json::to_value(&result.records).unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 7);
    assert!(array[1]["doi"].is_null());
    assert_eq!(array[0]["class"], "Artigos completos publicados em periódicos");
    assert_eq!(array[6]["class"], "Trabalhos completos publicados em anais de congressos");
}

#[test]
fn unstructured_page_uses_fallback() {
    let html = "<html><body>\
        <p><b>Artigos completos publicados em periódicos</b></p>\
        <ol><li>SILVA, J. . Primeiro artigo . Revista A, 2020.</li>\
        <li>SOUZA, M. . Segundo artigo . Revista B, 2021.</li></ol>\
        <p><b>Capítulos de livros publicados</b></p>\
        <p>COSTA, M. . Um capítulo . In: Livro. Editora, 2010.<br>\
        Voltar ao topo</p>\
        </body></html>";
    let result = extract_publications(html);
    assert_eq!(result.stage, ExtractionStage::Fallback);
    assert_eq!(result.count_for(Category::JournalArticle), 2);
    assert_eq!(result.count_for(Category::BookChapter), 1);
    assert_eq!(result.records[0].title, "Primeiro artigo");
    assert_eq!(result.records[2].place, "Livro. Editora");
}

#[test]
fn configured_extractor_drops_extra_keywords() {
    let config = ParsingConfigBuilder::new()
        .add_junk_keyword("Revista Ceres".to_string())
        .build()
        .unwrap();
    let result = PublicationExtractor::with_config(config).extract(SAMPLE);
    assert_eq!(result.count_for(Category::JournalArticle), 2);
    assert_eq!(result.stats.junk_dropped, 2);
}

#[test]
fn malformed_markup_does_not_panic() {
    for html in [
        "",
        "<",
        "<div class=\"cita-artigos\"><a name=\"ArtigosCompletos\">",
        "<div class='cita-artigos'><a name='ArtigosCompletos'></a></div><div><span class='transform'>",
        "Artigos completos publicados em periódicos",
        "Artigos completos publicados em periódicos<li>1. <li>",
    ] {
        let result = extract_publications(html);
        assert!(result.records.iter().all(|r| Category::ALL.contains(&r.category)));
    }
}
