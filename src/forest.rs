//! The forest of top-level sections and the pure operations over it.
//!
//! Every mutator borrows the current forest and hands back a new one. The caller decides
//! when to swap snapshots, so anything still holding the old forest (a renderer halfway
//! through a frame, a test comparing before and after) never sees a half-applied edit.
//!
//! Structural mutators do not renumber. Call [`Forest::renumber`] after any edit that adds,
//! removes or reorders sections.

use crate::error::TreeError;
use crate::numbering;
use crate::section::{NodeRole, SectionId, SectionNode, TableData, TableId};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
/// Ordered top-level sections of one document.
pub struct Forest {
    sections: Vec<SectionNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Replacement values for the editable fields of a section; `None` leaves a field alone.
pub struct SectionUpdate {
    /// New heading text.
    pub title: Option<String>,
    /// New body text.
    pub content: Option<String>,
    /// New table list.
    pub tables: Option<Vec<TableData>>,
}

impl SectionUpdate {
    /// Replaces the heading.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the body text.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Replaces the whole table list.
    #[must_use]
    pub fn with_tables(mut self, tables: Vec<TableData>) -> Self {
        self.tables = Some(tables);
        self
    }

    fn apply_to(&self, section: &mut SectionNode) {
        if let Some(title) = &self.title {
            section.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            section.content.clone_from(content);
        }
        if let Some(tables) = &self.tables {
            section.tables.clone_from(tables);
        }
    }
}

/// Pre-order, depth-first iterator over a forest, yielding each section with its depth.
///
/// Top-level sections have depth 0.
pub struct Walk<'a> {
    stack: Vec<(&'a SectionNode, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a SectionNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        Some((node, depth))
    }
}

impl Forest {
    #[must_use]
    /// Wraps a list of top-level sections as they are; numbers are not touched.
    pub fn new(sections: Vec<SectionNode>) -> Self {
        Self { sections }
    }

    /// Top-level sections in document order.
    #[must_use]
    pub fn sections(&self) -> &[SectionNode] {
        &self.sections
    }

    /// Unwraps the top-level sections.
    #[must_use]
    pub fn into_sections(self) -> Vec<SectionNode> {
        self.sections
    }

    /// Whether there are no sections at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections at every depth.
    #[must_use]
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    /// Walks every section in pre-order. Each call starts afresh from the current state.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.sections.iter().rev().map(|s| (s, 0)).collect(),
        }
    }

    /// Finds the first section in pre-order with this id.
    #[must_use]
    pub fn find(&self, id: &SectionId) -> Option<&SectionNode> {
        self.walk().map(|(node, _)| node).find(|node| &node.id == id)
    }

    /// Whether a section with this id exists anywhere in the forest.
    #[must_use]
    pub fn contains(&self, id: &SectionId) -> bool {
        self.find(id).is_some()
    }

    /// Finds the section whose children include `id`; `None` for top-level or unknown ids.
    #[must_use]
    pub fn parent_of(&self, id: &SectionId) -> Option<&SectionNode> {
        self.walk()
            .map(|(node, _)| node)
            .find(|node| node.children.iter().any(|child| &child.id == id))
    }

    /// Sections from the top level down to and including `id`.
    #[must_use]
    pub fn path_to(&self, id: &SectionId) -> Option<Vec<&SectionNode>> {
        fn descend<'a>(
            sections: &'a [SectionNode],
            id: &SectionId,
            path: &mut Vec<&'a SectionNode>,
        ) -> bool {
            for section in sections {
                path.push(section);
                if &section.id == id || descend(&section.children, id, path) {
                    return true;
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        descend(&self.sections, id, &mut path).then_some(path)
    }

    /// Finds a table inside a specific section.
    #[must_use]
    pub fn find_table(&self, section: &SectionId, table: &TableId) -> Option<&TableData> {
        self.find(section)?.table(table)
    }

    /// Recomputes every section number from its position.
    #[must_use]
    pub fn renumber(&self) -> Self {
        Self::new(numbering::renumber(&self.sections))
    }

    /// Replaces the supplied fields of one section. Unknown ids leave the forest unchanged.
    #[must_use]
    pub fn update(&self, id: &SectionId, changes: &SectionUpdate) -> Self {
        self.edit(id, |section| changes.apply_to(section))
    }

    /// Appends a new subsection to the end of `parent`'s children.
    #[must_use]
    pub fn insert_child(&self, parent: &SectionId) -> Self {
        self.insert_child_node(parent, SectionNode::new(NodeRole::Child))
    }

    /// Appends an already constructed section to the end of `parent`'s children.
    #[must_use]
    pub fn insert_child_node(&self, parent: &SectionId, node: SectionNode) -> Self {
        self.edit(parent, move |section| section.children.push(node))
    }

    /// Inserts a new section directly after `after`, in the same list.
    #[must_use]
    pub fn insert_sibling(&self, after: &SectionId) -> Self {
        self.insert_sibling_node(after, SectionNode::new(NodeRole::Sibling))
    }

    /// Inserts an already constructed section directly after `after`, in the same list.
    #[must_use]
    pub fn insert_sibling_node(&self, after: &SectionId, node: SectionNode) -> Self {
        let mut sections = self.sections.clone();
        if insert_after(&mut sections, after, node).is_err() {
            debug!(%after, "sibling insert target not found");
        }
        Self { sections }
    }

    /// Appends a new section at the end of the top level.
    #[must_use]
    pub fn append_top_level(&self) -> Self {
        self.append_top_level_node(SectionNode::new(NodeRole::Sibling))
    }

    /// Appends an already constructed section at the end of the top level.
    #[must_use]
    pub fn append_top_level_node(&self, node: SectionNode) -> Self {
        let mut sections = self.sections.clone();
        sections.push(node);
        Self { sections }
    }

    /// Removes a section and everything beneath it, wherever it sits.
    ///
    /// This is unconditional: it will happily remove the last top-level section.
    /// Use [`Forest::delete_checked`] when the document must stay non-empty.
    #[must_use]
    pub fn delete_subtree(&self, id: &SectionId) -> Self {
        let mut sections = self.sections.clone();
        remove(&mut sections, id);
        Self { sections }
    }

    /// Removes a section and its subtree, refusing to remove the only top-level section.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::LastTopLevelSection`] for the sole top-level section and
    /// [`TreeError::SectionNotFound`] for unknown ids.
    pub fn delete_checked(&self, id: &SectionId) -> Result<Self, TreeError> {
        if self.sections.len() == 1 && &self.sections[0].id == id {
            return Err(TreeError::LastTopLevelSection(id.clone()));
        }
        if !self.contains(id) {
            return Err(TreeError::SectionNotFound(id.clone()));
        }
        Ok(self.delete_subtree(id))
    }

    /// Appends a new empty `rows` x `cols` table to a section.
    ///
    /// An unknown section leaves the forest unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidDimensions`] when rows are outside 1..=20 or columns
    /// outside 1..=10. Nothing changes in that case.
    pub fn add_table(
        &self,
        section: &SectionId,
        rows: usize,
        cols: usize,
    ) -> Result<Self, TreeError> {
        let table = TableData::new(rows, cols)?;
        Ok(self.edit(section, move |node| node.tables.push(table)))
    }

    /// Removes a table from a section. Unknown ids leave the forest unchanged.
    #[must_use]
    pub fn delete_table(&self, section: &SectionId, table: &TableId) -> Self {
        self.edit(section, |node| node.tables.retain(|t| &t.id != table))
    }

    /// Replaces the text of exactly one cell.
    ///
    /// An unknown section or table leaves the forest unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::CellOutOfRange`] when `row` or `col` lies outside the table.
    pub fn update_cell(
        &self,
        section: &SectionId,
        table: &TableId,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<Self, TreeError> {
        if let Some(existing) = self.find_table(section, table) {
            if row >= existing.rows || col >= existing.cols {
                return Err(TreeError::CellOutOfRange {
                    row,
                    col,
                    rows: existing.rows,
                    cols: existing.cols,
                });
            }
        }

        let value = value.into();
        Ok(self.edit(section, move |node| {
            if let Some(cell) = node
                .tables
                .iter_mut()
                .find(|t| &t.id == table)
                .and_then(|t| t.data.get_mut(row))
                .and_then(|r| r.get_mut(col))
            {
                *cell = value;
            }
        }))
    }

    /// Copies the forest and applies `change` to the copy of section `id`, if present.
    fn edit(&self, id: &SectionId, change: impl FnOnce(&mut SectionNode)) -> Self {
        let mut sections = self.sections.clone();
        match find_mut(&mut sections, id) {
            Some(section) => change(section),
            None => debug!(%id, "edit target not found"),
        }
        Self { sections }
    }
}

fn find_mut<'a>(sections: &'a mut [SectionNode], id: &SectionId) -> Option<&'a mut SectionNode> {
    for section in sections {
        if &section.id == id {
            return Some(section);
        }
        if let Some(found) = find_mut(&mut section.children, id) {
            return Some(found);
        }
    }
    None
}

/// Inserts `node` after `id` in whichever list holds it, handing `node` back on a miss.
fn insert_after(
    sections: &mut Vec<SectionNode>,
    id: &SectionId,
    node: SectionNode,
) -> Result<(), SectionNode> {
    let mut node = node;
    for i in 0..sections.len() {
        if &sections[i].id == id {
            sections.insert(i + 1, node);
            return Ok(());
        }
        match insert_after(&mut sections[i].children, id, node) {
            Ok(()) => return Ok(()),
            Err(unplaced) => node = unplaced,
        }
    }
    Err(node)
}

fn remove(sections: &mut Vec<SectionNode>, id: &SectionId) {
    sections.retain(|section| &section.id != id);
    for section in sections {
        remove(&mut section.children, id);
    }
}

#[cfg(test)]
#[path = "tests/forest.rs"]
mod tests;
