use super::{check_dimensions, NodeRole, SectionId, SectionNode, TableData, TableId};
use crate::error::{DimensionBound, TreeError};

#[test]
fn test_generated_ids_are_unique() {
    let a = SectionId::generate();
    let b = SectionId::generate();
    assert_ne!(a, b);
    assert!(a.as_str().starts_with("sec-"));
    assert!(TableId::generate().as_str().starts_with("t-"));
}

#[test]
fn test_placeholder_titles() {
    assert_eq!(SectionNode::new(NodeRole::Child).title, "New Subsection");
    assert_eq!(SectionNode::new(NodeRole::Sibling).title, "New Section");
    assert!(SectionNode::new(NodeRole::Child).number.is_empty());
}

#[test]
fn test_number_prefix_strips_top_level_zero() {
    let mut section = SectionNode::with_title("A");
    section.number = "2.0".to_string();
    assert_eq!(section.number_prefix(), "2");
    section.number = "2.1".to_string();
    assert_eq!(section.number_prefix(), "2.1");
}

#[test]
fn test_new_table_is_blank_grid() {
    let table = TableData::new(3, 2).unwrap();
    assert_eq!(table.rows, 3);
    assert_eq!(table.cols, 2);
    assert!(table.is_rectangular());
    assert_eq!(table.cell(2, 1), Some(""));
    assert_eq!(table.cell(3, 0), None);
}

#[test]
fn test_dimension_bounds() {
    assert!(check_dimensions(1, 1).is_ok());
    assert!(check_dimensions(20, 10).is_ok());

    let cases = [
        (0, 3, DimensionBound::TooFewRows),
        (21, 3, DimensionBound::TooManyRows),
        (3, 0, DimensionBound::TooFewColumns),
        (3, 11, DimensionBound::TooManyColumns),
    ];
    for (rows, cols, bound) in cases {
        assert_eq!(
            TableData::new(rows, cols),
            Err(TreeError::InvalidDimensions { rows, cols, bound })
        );
    }
}

#[test]
fn test_from_cells_pads_ragged_rows() {
    let table = TableData::from_cells(vec![
        vec!["Name".to_string(), "Role".to_string()],
        vec!["Ada".to_string()],
    ])
    .unwrap();
    assert_eq!(table.cols, 2);
    assert!(table.is_rectangular());
    assert_eq!(table.cell(1, 1), Some(""));
}

#[test]
fn test_section_json_uses_plain_string_ids() {
    let section = SectionNode::with_title("Scope");
    let json = serde_json::to_value(&section).unwrap();
    assert_eq!(json["id"], section.id.as_str());
    assert_eq!(json["tables"], serde_json::json!([]));
}

#[test]
fn test_missing_children_and_tables_default_to_empty() {
    let section: SectionNode = serde_json::from_str(
        r#"{"id": "sec-9", "number": "9.0", "title": "Legacy", "content": ""}"#,
    )
    .unwrap();
    assert!(section.children.is_empty());
    assert!(section.tables.is_empty());
}
