//! Table of contents with page numbers assigned by visiting order.
//!
//! Each section occupies exactly one page, in pre-order, starting from the page after the
//! cover. This is a deterministic stand-in for real pagination: content length and table
//! size play no part.

use crate::forest::Forest;
use serde::Serialize;

/// First page available to sections; page 1 is the cover.
pub const DEFAULT_START_PAGE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One line of the table of contents.
pub struct TocEntry {
    /// Section number at the time the contents were generated.
    pub number: String,
    /// Section heading.
    pub title: String,
    /// Page the section is placed on.
    pub page: u32,
    /// Nesting depth, 0 for top-level sections.
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Flat outline of a forest plus the first page it left unused.
pub struct Toc {
    /// Entries in document order.
    pub entries: Vec<TocEntry>,
    /// Page after the last section, for chaining further content.
    pub next_page: u32,
}

/// Builds the contents of `forest`, placing the first section on `start_page`.
///
/// Page numbers stop at `u32::MAX` instead of wrapping.
#[must_use]
pub fn generate_toc(forest: &Forest, start_page: u32) -> Toc {
    let mut page = start_page;
    let mut entries = Vec::new();

    for (section, depth) in forest.walk() {
        entries.push(TocEntry {
            number: section.number.clone(),
            title: section.title.clone(),
            page,
            depth,
        });
        page = page.saturating_add(1);
    }

    Toc {
        entries,
        next_page: page,
    }
}

impl Toc {
    /// Lays the entries out as text lines `width` characters wide.
    ///
    /// Each level of depth indents by `indent` spaces and the page number is right-aligned
    /// behind a run of leader dots. Lines never drop below three dots, so very long titles
    /// overflow `width` rather than losing their page.
    #[must_use]
    pub fn render(&self, width: usize, indent: usize) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| {
                let left = format!(
                    "{}{:<6} {}",
                    " ".repeat(entry.depth * indent),
                    entry.number,
                    entry.title
                );
                let page = entry.page.to_string();
                let used = left.chars().count() + page.len() + 2;
                let dots = width.saturating_sub(used).max(3);
                format!("{left} {} {page}", ".".repeat(dots))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/toc.rs"]
mod tests;
