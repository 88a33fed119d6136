use super::{generate_project_number, resolve_page_token, Document, DocumentSetup, Zone};
use crate::error::Error;
use crate::forest::Forest;
use crate::section::{SectionId, TableData};
use chrono::NaiveDate;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

#[test]
fn test_starter_document_layout() {
    let doc = Document::starter(today());
    let numbers: Vec<(&str, &str)> = doc
        .sections
        .walk()
        .map(|(s, _)| (s.number.as_str(), s.title.as_str()))
        .collect();
    assert_eq!(
        numbers,
        vec![
            ("1.0", "Project Overview"),
            ("1.1", "Background"),
            ("1.2", "Objectives"),
            ("2.0", "Scope of Work"),
            ("2.1", "In Scope"),
            ("2.2", "Out of Scope"),
            ("3.0", "Deliverables"),
        ]
    );
    assert_eq!(doc.cover_page.date, "2026-03-01");
    assert_eq!(doc.sections.renumber(), doc.sections);
    doc.validate().unwrap();
}

#[test]
fn test_page_token_resolution() {
    assert_eq!(resolve_page_token("Page {PAGE}", 7), "Page 7");
    assert_eq!(resolve_page_token("No token", 7), "No token");
    assert_eq!(resolve_page_token("{PAGE}/{PAGE}", 3), "3/{PAGE}");

    let doc = Document::starter(today());
    assert_eq!(doc.header_footer.resolve(Zone::FooterRight, 4), "Page 4");
    assert_eq!(doc.header_footer.resolve(Zone::FooterLeft, 4), "SOW-2026-001");
}

#[test]
fn test_json_round_trip_keeps_stale_numbers() {
    let mut doc = Document::starter(today());
    let mut sections = doc.sections.clone().into_sections();
    sections[2].number = "9.9".to_string();
    doc.sections = Forest::new(sections);

    let json = doc.to_json().unwrap();
    assert!(json.contains("\"documentName\""));
    assert!(json.contains("\"coverPage\""));
    assert!(json.contains("\"headerFooter\""));
    assert!(json.contains("\"pageNumberPosition\": \"footer-right\""));

    let loaded = Document::from_json(&json).unwrap();
    assert_eq!(loaded, doc);
    assert_eq!(loaded.sections.sections()[2].number, "9.9");
}

#[test]
fn test_save_and_load_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sow.json");

    let mut doc = Document::starter(today());
    doc.sections = doc
        .sections
        .add_table(&SectionId::from("sec-3"), 2, 2)
        .unwrap();
    doc.save(&path).unwrap();

    assert_eq!(Document::load(&path).unwrap(), doc);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Document::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_validation_rejects_broken_documents() {
    let doc = Document::starter(today());

    let mut empty = doc.clone();
    empty.sections = Forest::default();
    assert!(matches!(empty.validate(), Err(Error::Invalid(_))));

    let mut duplicated = doc.clone();
    let mut sections = duplicated.sections.into_sections();
    sections[1].id = SectionId::from("sec-1");
    duplicated.sections = Forest::new(sections);
    assert!(matches!(duplicated.validate(), Err(Error::Invalid(_))));

    let mut ragged = doc.clone();
    let mut sections = ragged.sections.into_sections();
    let mut table = TableData::new(2, 2).unwrap();
    table.data.pop();
    sections[0].tables.push(table);
    ragged.sections = Forest::new(sections);
    assert!(matches!(ragged.validate(), Err(Error::Invalid(_))));

    let mut oversized = doc;
    let mut sections = oversized.sections.into_sections();
    let mut table = TableData::new(1, 1).unwrap();
    table.rows = 21;
    table.data = vec![vec![String::new()]; 21];
    sections[0].tables.push(table);
    oversized.sections = Forest::new(sections);
    match oversized.validate() {
        Err(Error::Invalid(message)) => assert!(message.contains("invalid dimensions")),
        other => panic!("expected Error::Invalid, got {other:?}"),
    }
}

#[test]
fn test_from_json_rejects_malformed_input() {
    assert!(matches!(Document::from_json("{"), Err(Error::Json(_))));
}

#[test]
fn test_missing_tables_default_on_load() {
    let json = r#"{
        "documentName": "Legacy",
        "coverPage": {
            "title": "Statement of Work", "projectNumber": "SOW-2025-010",
            "clientName": "", "building": "", "location": "", "preparedBy": "",
            "department": "", "date": "2025-02-03", "version": "1.0",
            "confidentiality": "Confidential"
        },
        "headerFooter": {
            "headerLeft": "", "headerCenter": "", "headerRight": "",
            "footerLeft": "", "footerCenter": "", "footerRight": "Page {PAGE}",
            "showPageNumbers": true, "pageNumberPosition": "footer-center"
        },
        "sections": [
            {"id": "sec-1", "number": "1.0", "title": "Intro", "content": "",
             "children": [{"id": "sec-1-1", "number": "1.1", "title": "Sub", "content": ""}]}
        ]
    }"#;
    let doc = Document::from_json(json).unwrap();
    assert_eq!(doc.sections.len(), 2);
    assert!(doc.sections.sections()[0].tables.is_empty());
}

#[test]
fn test_setup_overrides_starter_values() {
    let setup = DocumentSetup {
        document_name: Some("Boiler Upgrade".to_string()),
        title: Some("SOW: Boilers".to_string()),
        project_number: Some("SOW-2026-042".to_string()),
        building: Some(String::new()),
        date: Some("2026-04-09".to_string()),
        description: Some("Replace both boilers.".to_string()),
        ..DocumentSetup::default()
    };
    let doc = Document::from_setup(&setup, today());

    assert_eq!(doc.document_name, "Boiler Upgrade");
    assert_eq!(doc.cover_page.title, "SOW: Boilers");
    assert_eq!(doc.cover_page.project_number, "SOW-2026-042");
    assert_eq!(doc.header_footer.footer_left, "SOW-2026-042");
    // Blank answers keep the starter value
    assert_eq!(doc.cover_page.building, "3001");
    assert_eq!(doc.cover_page.date, "2026-04-09");
    assert_eq!(doc.header_footer.header_left, "SOW: Boilers\nApril 9, 2026");
    assert_eq!(doc.sections.sections()[0].content, "Replace both boilers.");
}

#[test]
fn test_setup_defaults_fill_blank_number_and_date() {
    let setup = DocumentSetup {
        document_name: Some("Chiller Swap".to_string()),
        project_number: Some(String::new()),
        ..DocumentSetup::default()
    }
    .with_defaults(today());

    assert_eq!(setup.date.as_deref(), Some("2026-03-01"));
    let number = setup.project_number.clone().unwrap();
    assert!(number.starts_with("SOW-2026-"));

    let doc = Document::from_setup(&setup, today());
    assert_eq!(doc.cover_page.project_number, number);
    assert_eq!(doc.header_footer.footer_left, number);
    assert_eq!(doc.header_footer.header_left, "Statement of Work\nMarch 1, 2026");

    let kept = DocumentSetup {
        project_number: Some("SOW-2025-007".to_string()),
        date: Some("2025-12-24".to_string()),
        ..DocumentSetup::default()
    }
    .with_defaults(today());
    assert_eq!(kept.project_number.as_deref(), Some("SOW-2025-007"));
    assert_eq!(kept.date.as_deref(), Some("2025-12-24"));
}

#[test]
fn test_suggested_file_name() {
    let mut doc = Document::starter(today());
    doc.document_name = "Boiler  Upgrade Phase 2".to_string();
    assert_eq!(
        doc.suggested_file_name(today()),
        "boiler-upgrade-phase-2-2026-03-01.json"
    );
}

#[test]
fn test_project_number_shape() {
    let number = generate_project_number(today());
    let seq = number.strip_prefix("SOW-2026-").unwrap();
    assert_eq!(seq.len(), 3);
    let seq: u32 = seq.parse().unwrap();
    assert!((1..=999).contains(&seq));
}
