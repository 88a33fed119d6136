//! Section numbering derived from tree position.
//!
//! Top-level sections read `1.0`, `2.0`, ... and nested sections extend their parent's
//! number with their 1-indexed position: the second child of `2.0` is `2.2`, and its first
//! child is `2.2.1`. Numbers are never carried over from a previous pass.

use crate::section::SectionNode;

/// Returns a copy of `sections` with every number recomputed.
#[must_use]
pub fn renumber(sections: &[SectionNode]) -> Vec<SectionNode> {
    renumber_level(sections, None)
}

/// Number for the section at 0-indexed `position` under `prefix`, or at the top level.
#[must_use]
pub fn section_number(prefix: Option<&str>, position: usize) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{}", position + 1),
        None => format!("{}.0", position + 1),
    }
}

fn renumber_level(sections: &[SectionNode], prefix: Option<&str>) -> Vec<SectionNode> {
    sections
        .iter()
        .enumerate()
        .map(|(position, section)| {
            let number = section_number(prefix, position);
            let child_prefix = number.strip_suffix(".0").unwrap_or(&number);
            let children = renumber_level(&section.children, Some(child_prefix));
            SectionNode {
                id: section.id.clone(),
                title: section.title.clone(),
                content: section.content.clone(),
                tables: section.tables.clone(),
                children,
                number,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/numbering.rs"]
mod tests;
