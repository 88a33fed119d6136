use super::{renumber, section_number};
use crate::section::SectionNode;

fn titled(title: &str, number: &str) -> SectionNode {
    let mut section = SectionNode::with_title(title);
    section.number = number.to_string();
    section
}

#[test]
fn test_section_number_format() {
    assert_eq!(section_number(None, 0), "1.0");
    assert_eq!(section_number(None, 4), "5.0");
    assert_eq!(section_number(Some("2"), 0), "2.1");
    assert_eq!(section_number(Some("2.3"), 1), "2.3.2");
}

#[test]
fn test_renumber_ignores_stale_numbers() {
    let forest = vec![
        titled("A", "7.0").child(
            titled("A1", "9.9")
                .child(titled("A1a", ""))
                .child(titled("A1b", "x")),
        ),
        titled("B", "1.0").child(titled("B1", "1.1")),
    ];
    let numbered = renumber(&forest);

    assert_eq!(numbered[0].number, "1.0");
    assert_eq!(numbered[0].children[0].number, "1.1");
    assert_eq!(numbered[0].children[0].children[0].number, "1.1.1");
    assert_eq!(numbered[0].children[0].children[1].number, "1.1.2");
    assert_eq!(numbered[1].number, "2.0");
    assert_eq!(numbered[1].children[0].number, "2.1");
}

#[test]
fn test_renumber_keeps_everything_but_numbers() {
    let forest = vec![titled("A", "").content("body")];
    let numbered = renumber(&forest);
    assert_eq!(numbered[0].id, forest[0].id);
    assert_eq!(numbered[0].title, "A");
    assert_eq!(numbered[0].content, "body");
    assert!(forest[0].number.is_empty());
}

#[test]
fn test_renumber_empty() {
    assert!(renumber(&[]).is_empty());
}
