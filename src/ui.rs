//! The UI renders the application state into something visible and vim-able.
//!
//! The draw function dispatches based on the current view (outline, editor or contents).
//! The outline shows the section tree using box-drawing characters, next to a preview of
//! the selected section.

use crate::app_state::{AppState, OutlineRow, View};
use crate::config::Config;
use crate::section::{SectionNode, TableData};
use edtui::{EditorTheme, EditorView, SyntaxHighlighter};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

const OUTLINE_HELP: &str =
    "↑/↓: Navigate | ←/→: Fold | Enter: Edit | a/s/A: Add | d: Delete | t: Contents | :q Quit";
const DETAIL_HELP: &str = ":w Save | :x Save & Exit | :q Exit | :title <text> | :table <r> <c>";
const TOC_HELP: &str = "t/Esc: Back to outline | :export <path> | :q Quit";

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &mut AppState, cfg: &Config) {
    let shown = match app.current_view {
        View::Command => app.return_view,
        view => view,
    };
    match shown {
        View::Detail => draw_detail(f, app),
        View::Toc => draw_toc(f, app, cfg),
        View::Outline | View::Command => draw_outline(f, app),
    }
}

/// Generate box-drawing prefix for tree structure
fn get_tree_prefix(level: usize, is_last: bool, parent_states: &[bool]) -> String {
    if level == 0 {
        return String::new();
    }

    let mut prefix = String::new();

    // Vertical lines for ancestors that still have siblings below
    for i in 0..level.saturating_sub(1) {
        if parent_states.get(i).copied().unwrap_or(false) {
            prefix.push_str("│   ");
        } else {
            prefix.push_str("    ");
        }
    }

    if is_last {
        prefix.push_str("└── ");
    } else {
        prefix.push_str("├── ");
    }

    prefix
}

/// Box-drawing prefix for every outline row.
fn tree_prefixes(rows: &[OutlineRow]) -> Vec<String> {
    let is_last: Vec<bool> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            !rows[i + 1..]
                .iter()
                .take_while(|next| next.depth >= row.depth)
                .any(|next| next.depth == row.depth)
        })
        .collect();

    // Whether each ancestor level still has siblings coming
    let mut parent_has_siblings: Vec<bool> = Vec::new();
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            parent_has_siblings.truncate(row.depth);
            while parent_has_siblings.len() < row.depth {
                parent_has_siblings.push(false);
            }
            let ancestors = parent_has_siblings.get(1..).unwrap_or(&[]);
            let prefix = get_tree_prefix(row.depth, is_last[i], ancestors);
            parent_has_siblings.push(!is_last[i]);
            prefix
        })
        .collect()
}

fn draw_outline(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[0]);

    let prefixes = tree_prefixes(&app.rows);
    let items: Vec<ListItem> = app
        .rows
        .iter()
        .zip(prefixes)
        .enumerate()
        .filter_map(|(i, (row, prefix))| {
            let section = app.forest().find(&row.id)?;
            let marker = match (row.has_children, row.expanded) {
                (false, _) => "  ",
                (true, true) => "▾ ",
                (true, false) => "▸ ",
            };
            let number_style = if row.depth == 0 {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let line = Line::from(vec![
                Span::raw(prefix),
                Span::raw(marker),
                Span::styled(format!("{} ", section.number), number_style),
                Span::raw(section.title.clone()),
            ]);

            let style = if i != app.current_row {
                Style::default()
            } else if app.pending_delete.is_some() {
                Style::default().fg(Color::Red).add_modifier(Modifier::REVERSED)
            } else {
                Style::default().add_modifier(Modifier::REVERSED)
            };
            Some(ListItem::new(line).style(style))
        })
        .collect();

    let title = if app.dirty {
        format!("{} [+]", app.document.document_name)
    } else {
        app.document.document_name.clone()
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, panes[0]);

    draw_preview(f, app, panes[1]);
    draw_status(f, app, chunks[1], OUTLINE_HELP);
}

fn draw_preview(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(section) = app.current_section() else {
        let empty = Paragraph::new("").block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    };

    let page = app
        .current_page()
        .map(|p| format!(" (page {p})"))
        .unwrap_or_default();
    let title = format!("{} {}{page}", section.number, section.title);
    let preview = Paragraph::new(preview_lines(section))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(preview, area);
}

fn preview_lines(section: &SectionNode) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = section
        .content
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();

    for (n, table) in section.tables.iter().enumerate() {
        lines.push(Line::from(""));
        lines.push(Line::styled(
            format!("Table {} ({}x{})", n + 1, table.rows, table.cols),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.extend(table_lines(table));
    }

    if !section.children.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::styled(
            format!("{} subsections", section.children.len()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines
}

fn table_lines(table: &TableData) -> Vec<Line<'static>> {
    let widths: Vec<usize> = (0..table.cols)
        .map(|c| {
            table
                .data
                .iter()
                .filter_map(|row| row.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(1)
        })
        .collect();

    table
        .data
        .iter()
        .enumerate()
        .map(|(r, row)| {
            let cells: Vec<String> = row
                .iter()
                .zip(widths.iter().copied())
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect();
            let text = format!("│ {} │", cells.join(" │ "));
            if r == 0 {
                Line::styled(text, Style::default().add_modifier(Modifier::BOLD))
            } else {
                Line::from(text)
            }
        })
        .collect()
}

fn draw_detail(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let breadcrumb = app.breadcrumb().join(" > ");
    let breadcrumb_widget = Paragraph::new(breadcrumb)
        .block(Block::default().borders(Borders::ALL).title("Navigation"));
    f.render_widget(breadcrumb_widget, chunks[0]);

    let title = format!(
        "{} (wrap at {} chars)",
        app.current_footer(),
        app.wrap_width
    );
    if let Some(ref mut editor_state) = app.editor_state {
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = wrap_area(block.inner(chunks[1]), app.wrap_width);
        f.render_widget(block, chunks[1]);

        let syntax_highlighter = SyntaxHighlighter::new("dracula", "md");
        let editor = EditorView::new(editor_state)
            .theme(EditorTheme::default())
            .syntax_highlighter(Some(syntax_highlighter))
            .wrap(true);

        f.render_widget(editor, inner);
    }

    draw_status(f, app, chunks[2], DETAIL_HELP);
}

/// Narrows the editor area so soft-wrapped lines break at `wrap_width` columns.
///
/// A width of zero leaves the area unchanged.
#[must_use]
pub fn wrap_area(area: Rect, wrap_width: usize) -> Rect {
    if wrap_width == 0 {
        return area;
    }
    let limit = u16::try_from(wrap_width).unwrap_or(u16::MAX);
    Rect {
        width: area.width.min(limit),
        ..area
    }
}

fn draw_toc(f: &mut Frame, app: &AppState, cfg: &Config) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let toc = app.toc();
    let lines: Vec<Line> = toc
        .render(cfg.toc_width, cfg.toc_indent)
        .into_iter()
        .zip(&toc.entries)
        .map(|(text, entry)| {
            if entry.depth == 0 {
                Line::styled(text, Style::default().add_modifier(Modifier::BOLD))
            } else {
                Line::from(text)
            }
        })
        .collect();

    let title = format!("Table of Contents ({} pages)", toc.entries.len());
    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(widget, chunks[0]);

    draw_status(f, app, chunks[1], TOC_HELP);
}

fn draw_status(f: &mut Frame, app: &AppState, area: Rect, help: &str) {
    let text = if app.current_view == View::Command {
        format!(":{}", app.command_buffer)
    } else if let Some(ref msg) = app.message {
        msg.clone()
    } else {
        help.to_string()
    };

    let widget = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

#[cfg(test)]
#[path = "tests/ui.rs"]
mod tests;
