//! Markdown format implementation using tree-sitter-md.
//!
//! Sections come from ATX-style headings (# syntax) and tables from GFM pipe tables. The
//! first row of a pipe table is its header row, and it becomes row 0 of the table grid.
//! Exported headings carry the section number in front of the title; importing strips it
//! again, since numbers are always recomputed from position. Body lines that would read as
//! headings or table rows are exported behind a backslash.

use crate::document::Document;
use crate::formats::Format;
use crate::section::TableData;

/// Deepest heading level markdown can express.
const MAX_HEADING_LEVEL: usize = 6;

/// Tree-sitter queries for ATX-style markdown headings and pipe tables.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn file_extensions(&self) -> &[&'static str] {
        &["md", "markdown"]
    }

    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn section_query(&self) -> &'static str {
        "(atx_heading) @heading"
    }

    fn table_query(&self) -> &'static str {
        "(pipe_table) @table"
    }

    fn heading(&self, node: tree_sitter::Node<'_>, source: &str) -> Option<(usize, String)> {
        let mut level = None;
        let mut title = "";
        let mut cursor = node.walk();

        for child in node.children(&mut cursor) {
            let kind = child.kind();
            if let Some(digit) = kind
                .strip_prefix("atx_h")
                .and_then(|rest| rest.strip_suffix("_marker"))
            {
                level = digit.parse().ok();
            } else if kind == "inline" {
                title = child.utf8_text(source.as_bytes()).ok()?.trim();
            }
        }

        level.map(|level| (level, strip_section_number(title).to_string()))
    }

    fn table_cells(&self, table_source: &str) -> Vec<Vec<String>> {
        table_source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(split_row)
            .filter(|cells| !is_delimiter_row(cells))
            .collect()
    }

    fn export(&self, document: &Document) -> String {
        let mut out = String::new();

        for (section, depth) in document.sections.walk() {
            let hashes = "#".repeat((depth + 1).min(MAX_HEADING_LEVEL));
            let title = section.title.replace('\n', " ");
            let heading = if section.number.is_empty() {
                title
            } else {
                format!("{} {title}", section.number)
            };
            out.push_str(&format!("{hashes} {}\n\n", heading.trim_end()));

            let content = section.content.trim();
            if !content.is_empty() {
                out.push_str(&escape_content(content));
                out.push_str("\n\n");
            }

            for table in &section.tables {
                out.push_str(&render_table(table));
                out.push('\n');
            }
        }

        let mut out = out.trim_end().to_string();
        out.push('\n');
        out
    }

    fn decode_content(&self, text: &str) -> String {
        unescape_content(text)
    }
}

/// Drops a leading section number such as `2.1` from heading text.
///
/// A heading that is nothing but a number belongs to an untitled section.
#[must_use]
pub fn strip_section_number(title: &str) -> &str {
    match title.split_once(char::is_whitespace) {
        Some((first, rest)) if is_section_number(first) => rest.trim_start(),
        None if is_section_number(title) => "",
        _ => title,
    }
}

fn is_section_number(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit())
        && token.contains('.')
        && token.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Backslash-escapes body lines that markdown would read as headings or table rows.
///
/// Lines already starting with a backslash are escaped too, so that
/// [`unescape_content`] can undo exactly one level.
#[must_use]
pub fn escape_content(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            let body = line.trim_start();
            let indent = &line[..line.len() - body.len()];
            if body.starts_with(['\\', '#', '|']) || body.contains('|') {
                format!("{indent}\\{body}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reverses [`escape_content`].
#[must_use]
pub fn unescape_content(text: &str) -> String {
    text.lines()
        .map(|line| {
            let body = line.trim_start();
            let indent = &line[..line.len() - body.len()];
            match body.strip_prefix('\\') {
                Some(rest) => format!("{indent}{rest}"),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_table(table: &TableData) -> String {
    let mut lines = Vec::with_capacity(table.rows + 1);
    for (i, row) in table.data.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|cell| escape_cell(cell)).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
        if i == 0 {
            lines.push(format!("|{}|", vec![" --- "; table.cols].join("|")));
        }
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

/// Splits one pipe table line into trimmed cells, honouring `\|` escapes.
fn split_row(line: &str) -> Vec<String> {
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = if line.ends_with('|') && !line.ends_with("\\|") {
        &line[..line.len() - 1]
    } else {
        line
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('|') => cell.push('|'),
                Some(other) => {
                    cell.push('\\');
                    cell.push(other);
                }
                None => cell.push('\\'),
            },
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

fn is_delimiter_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|cell| {
            let dashes = cell.trim_matches(':');
            !dashes.is_empty() && dashes.chars().all(|c| c == '-')
        })
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
