//! The state holder bridging the document forest and the interactive editor.
//!
//! The forest itself never changes in place. Every edit computes a new forest through the
//! pure operations, renumbers it when the shape changed, and swaps it into the document.
//! The set of expanded sections lives here rather than in the document: it is a property of
//! this editing session, not of the Statement of Work.

use crate::document::{Document, Zone};
use crate::error::{Result, TreeError};
use crate::forest::{Forest, SectionUpdate};
use crate::formats::markdown::MarkdownFormat;
use crate::section::{NodeRole, SectionId, SectionNode, TableId};
use crate::toc::{generate_toc, Toc};
use edtui::{EditorState, Lines};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Determines which UI screen renders and how input is interpreted.
pub enum View {
    /// Section outline with a preview of the selected section.
    Outline,
    /// Vim-like editor for the selected section's body.
    Detail,
    /// Captures vim-style command input after ':' is pressed.
    Command,
    /// Generated table of contents.
    Toc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether the event loop should keep running after a command.
pub enum Flow {
    /// Keep editing.
    Continue,
    /// Leave the editor.
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One visible line of the outline.
pub struct OutlineRow {
    /// Section shown on this line.
    pub id: SectionId,
    /// Nesting depth, 0 for top-level sections.
    pub depth: usize,
    /// Whether the section has subsections.
    pub has_children: bool,
    /// Whether its subsections are currently shown.
    pub expanded: bool,
}

/// Session state for the outline editor.
pub struct AppState {
    /// Document being edited.
    pub document: Document,
    /// Where `:w` writes; `None` until the first save picks a name.
    pub path: Option<PathBuf>,
    /// Sections whose children are shown in the outline.
    pub expanded: HashSet<SectionId>,
    /// Outline lines derived from the forest and `expanded`.
    pub rows: Vec<OutlineRow>,
    /// Selected outline line.
    pub current_row: usize,
    /// Active UI screen determining input handling.
    pub current_view: View,
    /// Screen to go back to when command input finishes.
    pub return_view: View,
    /// Editor buffer content when the detail view is active.
    pub editor_state: Option<EditorState>,
    /// Accumulates command input after ':' is pressed.
    pub command_buffer: String,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Section awaiting delete confirmation.
    pub pending_delete: Option<SectionId>,
    /// Column at which the section editor soft-wraps body text (0 uses the full width).
    pub wrap_width: usize,
    /// Page given to the first section in the table of contents.
    pub toc_start_page: u32,
    /// Whether there are edits not yet written to disk.
    pub dirty: bool,
}

impl AppState {
    #[must_use]
    /// Starts a session with every top-level section expanded and the first one selected.
    pub fn new(
        document: Document,
        path: Option<PathBuf>,
        wrap_width: usize,
        toc_start_page: u32,
    ) -> Self {
        let expanded = document
            .sections
            .sections()
            .iter()
            .map(|s| s.id.clone())
            .collect();

        let mut state = Self {
            document,
            path,
            expanded,
            rows: Vec::new(),
            current_row: 0,
            current_view: View::Outline,
            return_view: View::Outline,
            editor_state: None,
            command_buffer: String::new(),
            message: None,
            pending_delete: None,
            wrap_width,
            toc_start_page,
            dirty: false,
        };
        state.rebuild_rows();
        state
    }

    /// Recomputes the visible outline lines, keeping the selection in range.
    pub fn rebuild_rows(&mut self) {
        fn visit(
            sections: &[SectionNode],
            depth: usize,
            expanded: &HashSet<SectionId>,
            rows: &mut Vec<OutlineRow>,
        ) {
            for section in sections {
                let is_expanded = expanded.contains(&section.id);
                rows.push(OutlineRow {
                    id: section.id.clone(),
                    depth,
                    has_children: !section.children.is_empty(),
                    expanded: is_expanded,
                });
                if is_expanded {
                    visit(&section.children, depth + 1, expanded, rows);
                }
            }
        }

        let mut rows = Vec::new();
        visit(self.forest().sections(), 0, &self.expanded, &mut rows);
        self.rows = rows;
        self.current_row = self.current_row.min(self.rows.len().saturating_sub(1));
    }

    /// Sections of the document.
    #[must_use]
    pub fn forest(&self) -> &Forest {
        &self.document.sections
    }

    /// Id of the selected section.
    #[must_use]
    pub fn current_id(&self) -> Option<&SectionId> {
        self.rows.get(self.current_row).map(|row| &row.id)
    }

    /// The selected section.
    #[must_use]
    pub fn current_section(&self) -> Option<&SectionNode> {
        self.forest().find(self.current_id()?)
    }

    /// Table of contents for the current forest.
    #[must_use]
    pub fn toc(&self) -> Toc {
        generate_toc(self.forest(), self.toc_start_page)
    }

    /// Page the selected section falls on.
    #[must_use]
    pub fn current_page(&self) -> Option<u32> {
        let id = self.current_id()?;
        self.forest()
            .walk()
            .position(|(section, _)| &section.id == id)
            .and_then(|i| u32::try_from(i).ok())
            .map(|i| self.toc_start_page.saturating_add(i))
    }

    /// Footer text for the selected section's page.
    #[must_use]
    pub fn current_footer(&self) -> String {
        let page = self.current_page().unwrap_or(self.toc_start_page);
        let hf = &self.document.header_footer;
        [Zone::FooterLeft, Zone::FooterCenter, Zone::FooterRight]
            .into_iter()
            .map(|zone| hf.resolve(zone, page))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Breadcrumb titles from the top level down to the selected section.
    #[must_use]
    pub fn breadcrumb(&self) -> Vec<String> {
        self.current_id()
            .and_then(|id| self.forest().path_to(id))
            .map(|path| {
                path.iter()
                    .map(|s| format!("{} {}", s.number, s.title))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Selects `id`, expanding its ancestors so that it is visible.
    pub fn select(&mut self, id: &SectionId) {
        if let Some(path) = self.forest().path_to(id) {
            let ancestors: Vec<SectionId> = path
                .iter()
                .take(path.len().saturating_sub(1))
                .map(|s| s.id.clone())
                .collect();
            self.expanded.extend(ancestors);
        }
        self.rebuild_rows();
        if let Some(index) = self.rows.iter().position(|row| &row.id == id) {
            self.current_row = index;
        }
    }

    // --- Navigation ---

    /// Moves the selection one line up.
    pub fn move_up(&mut self) {
        self.current_row = self.current_row.saturating_sub(1);
    }

    /// Moves the selection one line down.
    pub fn move_down(&mut self) {
        if self.current_row + 1 < self.rows.len() {
            self.current_row += 1;
        }
    }

    /// Jumps to the first line.
    pub fn move_to_first(&mut self) {
        self.current_row = 0;
    }

    /// Jumps to the last line.
    pub fn move_to_last(&mut self) {
        self.current_row = self.rows.len().saturating_sub(1);
    }

    /// Collapses the selected section, or moves to its parent if already collapsed.
    pub fn collapse_or_parent(&mut self) {
        let Some(row) = self.rows.get(self.current_row).cloned() else {
            return;
        };
        if row.has_children && row.expanded {
            self.expanded.remove(&row.id);
            self.rebuild_rows();
        } else if let Some(parent) = self.forest().parent_of(&row.id).map(|p| p.id.clone()) {
            self.select(&parent);
        }
    }

    /// Expands the selected section, or moves to its first child if already expanded.
    pub fn expand_or_child(&mut self) {
        let Some(row) = self.rows.get(self.current_row).cloned() else {
            return;
        };
        if !row.has_children {
            return;
        }
        if row.expanded {
            self.move_down();
        } else {
            self.expanded.insert(row.id);
            self.rebuild_rows();
        }
    }

    /// Flips whether the selected section's children are shown.
    pub fn toggle_expand(&mut self) {
        if let Some(id) = self.current_id().cloned() {
            if !self.expanded.remove(&id) {
                self.expanded.insert(id);
            }
            self.rebuild_rows();
        }
    }

    // --- Structural edits ---

    /// Swaps in a forest whose shape changed, renumbering it first.
    fn commit_structure(&mut self, forest: &Forest) {
        self.document.sections = forest.renumber();
        let forest = &self.document.sections;
        self.expanded.retain(|id| forest.contains(id));
        self.dirty = true;
        self.rebuild_rows();
    }

    /// Swaps in a forest whose shape is unchanged.
    fn commit_content(&mut self, forest: Forest) {
        self.document.sections = forest;
        self.dirty = true;
    }

    /// Appends a subsection to the selected section and selects it.
    pub fn add_child(&mut self) {
        let Some(parent) = self.current_id().cloned() else {
            return;
        };
        let node = SectionNode::new(NodeRole::Child);
        let id = node.id.clone();
        let forest = self.forest().insert_child_node(&parent, node);
        self.expanded.insert(parent.clone());
        self.commit_structure(&forest);
        self.select(&id);
        debug!(%parent, %id, "added subsection");
    }

    /// Inserts a section after the selected one and selects it.
    pub fn add_sibling(&mut self) {
        let Some(after) = self.current_id().cloned() else {
            return;
        };
        let node = SectionNode::new(NodeRole::Sibling);
        let id = node.id.clone();
        let forest = self.forest().insert_sibling_node(&after, node);
        self.commit_structure(&forest);
        self.select(&id);
        debug!(%after, %id, "added section");
    }

    /// Appends a section at the end of the top level and selects it.
    pub fn add_top_level(&mut self) {
        let node = SectionNode::new(NodeRole::Sibling);
        let id = node.id.clone();
        let forest = self.forest().append_top_level_node(node);
        self.commit_structure(&forest);
        self.select(&id);
        debug!(%id, "added top-level section");
    }

    /// Asks for confirmation before deleting the selected section.
    pub fn request_delete(&mut self) {
        let Some(section) = self.current_section() else {
            return;
        };
        let prompt = format!(
            "Delete {} {} and all its subsections? (y/n)",
            section.number, section.title
        );
        let id = section.id.clone();
        self.pending_delete = Some(id);
        self.message = Some(prompt);
    }

    /// Drops a pending delete request.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.message = None;
    }

    /// Deletes the section awaiting confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::LastTopLevelSection`] for the only top-level section.
    pub fn confirm_delete(&mut self) -> std::result::Result<(), TreeError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(());
        };
        self.delete_section(&id)
    }

    /// Deletes a section and its subtree, refusing to empty the document.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::LastTopLevelSection`] for the only top-level section and
    /// [`TreeError::SectionNotFound`] for unknown ids.
    pub fn delete_section(&mut self, id: &SectionId) -> std::result::Result<(), TreeError> {
        match self.forest().delete_checked(id) {
            Ok(forest) => {
                self.commit_structure(&forest);
                self.message = Some("Section deleted".to_string());
                debug!(%id, "deleted section");
                Ok(())
            }
            Err(e) => {
                warn!(%id, error = %e, "delete refused");
                self.message = Some(e.to_string());
                Err(e)
            }
        }
    }

    // --- Content edits ---

    /// Renames the selected section.
    pub fn set_title(&mut self, title: &str) {
        if let Some(id) = self.current_id().cloned() {
            let forest = self
                .forest()
                .update(&id, &SectionUpdate::default().with_title(title));
            self.commit_content(forest);
        }
    }

    /// Replaces the selected section's body.
    pub fn set_content(&mut self, content: &str) {
        if let Some(id) = self.current_id().cloned() {
            let forest = self
                .forest()
                .update(&id, &SectionUpdate::default().with_content(content));
            self.commit_content(forest);
        }
    }

    /// Id of the selected section's `n`th table, counting from 1.
    #[must_use]
    pub fn table_id_at(&self, n: usize) -> Option<TableId> {
        let index = n.checked_sub(1)?;
        self.current_section()?
            .tables
            .get(index)
            .map(|t| t.id.clone())
    }

    /// Appends an empty table to the selected section.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidDimensions`] when the size is out of bounds.
    pub fn add_table(&mut self, rows: usize, cols: usize) -> std::result::Result<(), TreeError> {
        let Some(id) = self.current_id().cloned() else {
            return Ok(());
        };
        let forest = self.forest().add_table(&id, rows, cols)?;
        self.commit_content(forest);
        debug!(%id, rows, cols, "added table");
        Ok(())
    }

    /// Removes a table from the selected section.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::TableNotFound`] when the selected section has no such table.
    pub fn delete_table(&mut self, table: &TableId) -> std::result::Result<(), TreeError> {
        let Some(id) = self.current_id().cloned() else {
            return Ok(());
        };
        if self.forest().find_table(&id, table).is_none() {
            return Err(TreeError::TableNotFound {
                section: id,
                table: table.clone(),
            });
        }
        let forest = self.forest().delete_table(&id, table);
        self.commit_content(forest);
        Ok(())
    }

    /// Rewrites one cell of a table in the selected section.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::CellOutOfRange`] for positions outside the table.
    pub fn set_cell(
        &mut self,
        table: &TableId,
        row: usize,
        col: usize,
        value: &str,
    ) -> std::result::Result<(), TreeError> {
        let Some(id) = self.current_id().cloned() else {
            return Ok(());
        };
        let forest = self.forest().update_cell(&id, table, row, col, value)?;
        self.commit_content(forest);
        Ok(())
    }

    // --- Detail editor ---

    /// Loads the selected section's body into the editor buffer.
    pub fn enter_detail_view(&mut self) {
        let Some(section) = self.current_section() else {
            return;
        };
        let lines = Lines::from(section.content.as_str());
        self.editor_state = Some(EditorState::new(lines));
        self.current_view = View::Detail;
    }

    /// Text currently in the editor buffer.
    #[must_use]
    pub fn editor_text(&self) -> Option<String> {
        self.editor_state.as_ref().map(|editor_state| {
            editor_state
                .lines
                .iter_row()
                .map(|line| line.iter().collect::<String>())
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    /// Copies the editor buffer into the selected section's body, if it changed.
    pub fn commit_editor(&mut self) {
        let Some(text) = self.editor_text() else {
            return;
        };
        if self.current_section().is_some_and(|s| s.content != text) {
            self.set_content(&text);
        }
    }

    /// Returns to the outline, optionally keeping the editor's changes.
    pub fn exit_detail_view(&mut self, save: bool) {
        if save {
            self.commit_editor();
        }
        self.editor_state = None;
        self.current_view = View::Outline;
        self.return_view = View::Outline;
    }

    // --- Commands ---

    /// Switches to command input, remembering where to return.
    pub fn begin_command(&mut self) {
        self.return_view = self.current_view;
        self.current_view = View::Command;
        self.command_buffer.clear();
        self.message = None;
    }

    /// Leaves command input without running anything.
    pub fn cancel_command(&mut self) {
        self.current_view = self.return_view;
        self.command_buffer.clear();
    }

    /// Writes the document to its path, choosing a name on first save.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self.path.clone().unwrap_or_else(|| {
            PathBuf::from(
                self.document
                    .suggested_file_name(chrono::Local::now().date_naive()),
            )
        });
        self.document.save(&path)?;
        self.path = Some(path.clone());
        self.dirty = false;
        Ok(path)
    }

    /// Writes the sections as markdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn export(&self, path: &Path) -> Result<()> {
        self.document.export_to(&MarkdownFormat, path)
    }

    fn save_with_message(&mut self) -> bool {
        match self.save() {
            Ok(path) => {
                self.message = Some(format!("Saved {}", path.display()));
                true
            }
            Err(e) => {
                self.message = Some(format!("Error saving: {e}"));
                false
            }
        }
    }

    /// Runs one `:` command and reports whether to keep going.
    pub fn execute(&mut self, input: &str) -> Flow {
        let input = input.trim();
        let (name, rest) = input
            .split_once(' ')
            .map_or((input, ""), |(name, rest)| (name, rest.trim()));
        if self.current_view == View::Command {
            self.current_view = self.return_view;
        }
        let in_editor = self.current_view == View::Detail;
        self.command_buffer.clear();
        info!(command = name, "running command");

        match name {
            "w" => {
                if in_editor {
                    self.commit_editor();
                }
                self.save_with_message();
            }
            "x" | "wq" => {
                if in_editor {
                    self.commit_editor();
                }
                if self.save_with_message() {
                    if !in_editor {
                        return Flow::Quit;
                    }
                    self.exit_detail_view(false);
                }
            }
            "q" => {
                if in_editor {
                    self.exit_detail_view(false);
                } else if self.dirty {
                    self.message =
                        Some("Unsaved changes: :wq to save and quit, :q! to discard".to_string());
                } else {
                    return Flow::Quit;
                }
            }
            "q!" => {
                if in_editor {
                    self.exit_detail_view(false);
                } else {
                    return Flow::Quit;
                }
            }
            "title" => self.set_title(rest),
            "name" => {
                self.document.document_name = rest.to_string();
                self.dirty = true;
            }
            "table" => self.command_add_table(rest),
            "dtable" => self.command_delete_table(rest),
            "cell" => self.command_set_cell(rest),
            "export" => {
                if rest.is_empty() {
                    self.message = Some("Usage: export <path>".to_string());
                } else {
                    self.message = Some(match self.export(Path::new(rest)) {
                        Ok(()) => format!("Exported {rest}"),
                        Err(e) => format!("Error exporting: {e}"),
                    });
                }
            }
            "toc" => self.current_view = View::Toc,
            _ => self.message = Some(format!("Unknown command: {input}")),
        }
        Flow::Continue
    }

    fn command_add_table(&mut self, args: &str) {
        let dims: Option<Vec<usize>> = args
            .split_whitespace()
            .map(|a| a.parse().ok())
            .collect();
        let Some(&[rows, cols]) = dims.as_deref() else {
            self.message = Some("Usage: table <rows> <cols>".to_string());
            return;
        };
        self.message = Some(match self.add_table(rows, cols) {
            Ok(()) => format!("Added {rows}x{cols} table"),
            Err(e) => e.to_string(),
        });
    }

    fn command_delete_table(&mut self, args: &str) {
        let table = args.parse().ok().and_then(|n| self.table_id_at(n));
        match table {
            Some(table) => {
                self.message = Some(match self.delete_table(&table) {
                    Ok(()) => "Table deleted".to_string(),
                    Err(e) => e.to_string(),
                });
            }
            None => self.message = Some(format!("No table {args}")),
        }
    }

    fn command_set_cell(&mut self, args: &str) {
        let mut parts = args.splitn(4, ' ');
        let mut index = || parts.next().and_then(|p| p.trim().parse::<usize>().ok());
        let (Some(n), Some(row), Some(col)) = (index(), index(), index()) else {
            self.message = Some("Usage: cell <table> <row> <col> <text>".to_string());
            return;
        };
        let text = parts.next().unwrap_or("").to_string();
        let Some(table) = self.table_id_at(n) else {
            self.message = Some(format!("No table {n}"));
            return;
        };
        let (Some(row), Some(col)) = (row.checked_sub(1), col.checked_sub(1)) else {
            self.message = Some("Rows and columns count from 1".to_string());
            return;
        };
        if let Err(e) = self.set_cell(&table, row, col, &text) {
            self.message = Some(e.to_string());
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
