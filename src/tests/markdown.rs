use super::{
    escape_content, split_row, strip_section_number, unescape_content, MarkdownFormat,
};
use crate::document::Document;
use crate::formats::Format;
use crate::forest::Forest;
use crate::section::{SectionNode, TableData};
use chrono::NaiveDate;

fn document(sections: Vec<SectionNode>) -> Document {
    let mut doc = Document::starter(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    doc.sections = Forest::new(sections).renumber();
    doc
}

#[test]
fn test_strip_section_number() {
    assert_eq!(strip_section_number("2.1 In Scope"), "In Scope");
    assert_eq!(strip_section_number("1.0  Overview"), "Overview");
    assert_eq!(strip_section_number("2024 Budget"), "2024 Budget");
    assert_eq!(strip_section_number("v1.2 Release"), "v1.2 Release");
    assert_eq!(strip_section_number("Scope"), "Scope");
    assert_eq!(strip_section_number("1.0"), "");
    assert_eq!(strip_section_number("2.3.1"), "");
    assert_eq!(strip_section_number("2024"), "2024");
}

#[test]
fn test_escape_content_guards_block_syntax() {
    let content = "Plain line\n# Heading?\n  | cell |\nx | y\n\\raw";
    let escaped = escape_content(content);
    assert_eq!(
        escaped,
        "Plain line\n\\# Heading?\n  \\| cell |\n\\x | y\n\\\\raw"
    );
    assert_eq!(unescape_content(&escaped), content);
}

#[test]
fn test_split_row_honours_escapes() {
    assert_eq!(split_row("| a | b |"), vec!["a", "b"]);
    assert_eq!(split_row("| x \\| y | z |"), vec!["x | y", "z"]);
    assert_eq!(split_row("| | last |"), vec!["", "last"]);
}

#[test]
fn test_table_cells_skip_delimiter_row() {
    let cells = MarkdownFormat.table_cells("| Item | Qty |\n| :--- | ---: |\n| Pump | 2 |\n");
    assert_eq!(
        cells,
        vec![
            vec!["Item".to_string(), "Qty".to_string()],
            vec!["Pump".to_string(), "2".to_string()],
        ]
    );
}

#[test]
fn test_export_headings_content_and_tables() {
    let mut table = TableData::new(2, 2).unwrap();
    table.data = vec![
        vec!["Item".to_string(), "Qty".to_string()],
        vec!["Pipe | 2in".to_string(), "4".to_string()],
    ];
    let mut scope = SectionNode::with_title("Scope").content("What we do.");
    scope.tables.push(table);
    let doc = document(vec![
        SectionNode::with_title("Overview").child(SectionNode::with_title("Background")),
        scope,
    ]);

    let out = MarkdownFormat.export(&doc);
    assert_eq!(
        out,
        "# 1.0 Overview\n\n\
         ## 1.1 Background\n\n\
         # 2.0 Scope\n\n\
         What we do.\n\n\
         | Item | Qty |\n\
         | --- | --- |\n\
         | Pipe \\| 2in | 4 |\n"
    );
}

#[test]
fn test_export_caps_heading_depth() {
    let mut deepest = SectionNode::with_title("L7");
    for level in (1..=6).rev() {
        deepest = SectionNode::with_title(format!("L{level}")).child(deepest);
    }
    let out = MarkdownFormat.export(&document(vec![deepest]));
    assert!(out.contains("###### 1.1.1.1.1.1 L6\n"));
    assert!(out.contains("###### 1.1.1.1.1.1.1 L7\n"));
}
