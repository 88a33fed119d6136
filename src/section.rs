//! Section and table representation for the document outline.
//!
//! A section is one numbered heading in a Statement of Work. Sections own their nested
//! subsections and any tables embedded in their body. No section knows its parent: the
//! hierarchy is implied by where a section sits in the forest, and is rediscovered by
//! traversal whenever it is needed.

use crate::error::{DimensionBound, TreeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Largest number of rows a table may be created with.
pub const MAX_TABLE_ROWS: usize = 20;
/// Largest number of columns a table may be created with.
pub const MAX_TABLE_COLS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Opaque, unique identifier of a section.
pub struct SectionId(String);

impl SectionId {
    #[must_use]
    /// Mints a fresh id that has never been handed out before.
    pub fn generate() -> Self {
        Self(format!("sec-{}", Uuid::new_v4().simple()))
    }

    /// Borrows the id as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SectionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Opaque, unique identifier of a table.
pub struct TableId(String);

impl TableId {
    #[must_use]
    /// Mints a fresh table id.
    pub fn generate() -> Self {
        Self(format!("t-{}", Uuid::new_v4().simple()))
    }

    /// Borrows the id as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TableId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where a newly constructed section is about to be spliced in.
pub enum NodeRole {
    /// Appended to the children of an existing section.
    Child,
    /// Placed after an existing section in the same list, or appended at the top level.
    Sibling,
}

impl NodeRole {
    /// Title placeholder shown until the user names the section.
    #[must_use]
    pub fn placeholder_title(self) -> &'static str {
        match self {
            Self::Child => "New Subsection",
            Self::Sibling => "New Section",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One heading of the document together with its body, tables and subsections.
pub struct SectionNode {
    /// Identity of the section, fixed at creation.
    pub id: SectionId,
    /// Display number such as `2.0` or `2.1.3`, derived from position by renumbering.
    pub number: String,
    /// Heading text.
    pub title: String,
    /// Body text, possibly spanning several lines.
    pub content: String,
    #[serde(default)]
    /// Tables shown after the body, in display order.
    pub tables: Vec<TableData>,
    #[serde(default)]
    /// Nested subsections in document order.
    pub children: Vec<SectionNode>,
}

impl SectionNode {
    #[must_use]
    /// Constructs a detached section with a fresh id and the role's placeholder title.
    ///
    /// The number stays empty until the forest it is spliced into is renumbered.
    pub fn new(role: NodeRole) -> Self {
        Self::with_title(role.placeholder_title())
    }

    #[must_use]
    /// Constructs a detached section with a fresh id and the given heading.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            id: SectionId::generate(),
            number: String::new(),
            title: title.into(),
            content: String::new(),
            tables: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets the body text, consuming and returning the section.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Appends a subsection, consuming and returning the section.
    #[must_use]
    pub fn child(mut self, child: SectionNode) -> Self {
        self.children.push(child);
        self
    }

    /// Looks up one of this section's own tables.
    #[must_use]
    pub fn table(&self, id: &TableId) -> Option<&TableData> {
        self.tables.iter().find(|t| &t.id == id)
    }

    /// Number with any trailing `.0` removed, used as the prefix for child numbers.
    #[must_use]
    pub fn number_prefix(&self) -> &str {
        self.number.strip_suffix(".0").unwrap_or(&self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A rectangular grid of text cells embedded in a section.
pub struct TableData {
    /// Identity of the table, fixed at creation.
    pub id: TableId,
    /// Row count, between 1 and [`MAX_TABLE_ROWS`].
    pub rows: usize,
    /// Column count, between 1 and [`MAX_TABLE_COLS`].
    pub cols: usize,
    /// Row-major cells; always `rows` rows of `cols` cells.
    pub data: Vec<Vec<String>>,
}

impl TableData {
    /// Creates an empty `rows` x `cols` table with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidDimensions`] when either dimension is out of bounds.
    pub fn new(rows: usize, cols: usize) -> Result<Self, TreeError> {
        check_dimensions(rows, cols)?;
        Ok(Self {
            id: TableId::generate(),
            rows,
            cols,
            data: vec![vec![String::new(); cols]; rows],
        })
    }

    /// Creates a table from existing cell text, padding short rows with empty cells.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidDimensions`] when the grid is empty or too large.
    pub fn from_cells(cells: Vec<Vec<String>>) -> Result<Self, TreeError> {
        let rows = cells.len();
        let cols = cells.iter().map(Vec::len).max().unwrap_or(0);
        check_dimensions(rows, cols)?;
        let data = cells
            .into_iter()
            .map(|mut row| {
                row.resize(cols, String::new());
                row
            })
            .collect();
        Ok(Self {
            id: TableId::generate(),
            rows,
            cols,
            data,
        })
    }

    /// Reads one cell, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.data.get(row)?.get(col).map(String::as_str)
    }

    /// Whether `data` matches the declared `rows` and `cols`.
    #[must_use]
    pub fn is_rectangular(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
    }
}

/// Validates table dimensions against the creation bounds.
///
/// # Errors
///
/// Returns [`TreeError::InvalidDimensions`] naming the first violated bound.
pub fn check_dimensions(rows: usize, cols: usize) -> Result<(), TreeError> {
    let bound = if rows < 1 {
        Some(DimensionBound::TooFewRows)
    } else if rows > MAX_TABLE_ROWS {
        Some(DimensionBound::TooManyRows)
    } else if cols < 1 {
        Some(DimensionBound::TooFewColumns)
    } else if cols > MAX_TABLE_COLS {
        Some(DimensionBound::TooManyColumns)
    } else {
        None
    };

    match bound {
        Some(bound) => Err(TreeError::InvalidDimensions { rows, cols, bound }),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "tests/section.rs"]
mod tests;
