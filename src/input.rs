//! Reading documents from disk, whatever format they are stored in.
//!
//! JSON files are full documents. Other formats only describe sections, so they are parsed
//! with tree-sitter into a forest and wrapped in the starter envelope.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::forest::Forest;
use crate::formats::markdown::MarkdownFormat;
use crate::formats::Format;
use crate::section::{SectionNode, TableData};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use streaming_iterator::StreamingIterator;
use tracing::{info, warn};
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, Tree};

/// Loads a document, choosing the reader from the file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or its extension is unknown.
pub fn load_document(path: &Path) -> Result<Document> {
    let format = MarkdownFormat;
    match path.extension().and_then(OsStr::to_str) {
        Some("json") => Document::load(path),
        Some(ext) if format.file_extensions().contains(&ext) => import_document(path, &format),
        _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Builds a document from a file in a section-only format, named after the file stem.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds no sections.
pub fn import_document(path: &Path, format: &impl Format) -> Result<Document> {
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sections = extract_sections(&source, format)?;

    let mut doc = Document::default();
    if let Some(stem) = path.file_stem().and_then(OsStr::to_str) {
        doc.document_name = stem.to_string();
    }
    doc.sections = sections;
    info!(path = %path.display(), sections = doc.sections.len(), "imported document");
    Ok(doc)
}

/// Parses `source` into a renumbered forest.
///
/// Each heading nests under the nearest earlier heading of a shallower level. The text up
/// to the next heading becomes its content, except for tables, which become table grids.
/// Anything before the first heading is dropped.
///
/// # Errors
///
/// Returns [`Error::Markdown`] when the source cannot be parsed or has no headings, and
/// [`Error::Tree`] when a table exceeds the size limits.
pub fn extract_sections(source: &str, format: &impl Format) -> Result<Forest> {
    let language = format.language();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| Error::Markdown(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Markdown("parser produced no syntax tree".to_string()))?;

    let headings = capture(&language, format.section_query(), &tree, source)?;
    let tables = capture(&language, format.table_query(), &tree, source)?;

    let Some(first) = headings.first() else {
        return Err(Error::Markdown("no headings found".to_string()));
    };
    if !source[..first.start_byte()].trim().is_empty() {
        warn!("ignoring text before the first heading");
    }

    let mut flat = Vec::with_capacity(headings.len());
    for (i, heading) in headings.iter().enumerate() {
        let Some((level, title)) = format.heading(*heading, source) else {
            continue;
        };
        let body_start = heading.end_byte();
        let body_end = headings
            .get(i + 1)
            .map_or(source.len(), Node::start_byte)
            .max(body_start);

        let mut section = SectionNode::with_title(title);
        let mut paragraphs = Vec::new();
        let mut cursor = body_start;
        for table in tables
            .iter()
            .filter(|t| t.start_byte() >= body_start && t.end_byte() <= body_end)
        {
            paragraphs.push(&source[cursor..table.start_byte()]);
            let cells = format.table_cells(&source[table.start_byte()..table.end_byte()]);
            section.tables.push(TableData::from_cells(cells)?);
            cursor = table.end_byte();
        }
        paragraphs.push(&source[cursor..body_end]);

        section.content = paragraphs
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| format.decode_content(p))
            .collect::<Vec<_>>()
            .join("\n\n");
        flat.push((level, section));
    }

    Ok(Forest::new(nest(flat)).renumber())
}

/// Runs `query` over the whole tree and returns captured nodes in source order.
fn capture<'tree>(
    language: &Language,
    query: &str,
    tree: &'tree Tree,
    source: &str,
) -> Result<Vec<Node<'tree>>> {
    let query = Query::new(language, query).map_err(|e| Error::Markdown(e.to_string()))?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());

    let mut nodes = Vec::new();
    while let Some(m) = matches.next() {
        nodes.extend(m.captures.iter().map(|c| c.node));
    }
    nodes.sort_by_key(Node::start_byte);
    Ok(nodes)
}

/// Turns `(level, section)` pairs in document order into a forest.
fn nest(flat: Vec<(usize, SectionNode)>) -> Vec<SectionNode> {
    fn close(stack: &mut Vec<(usize, SectionNode)>, roots: &mut Vec<SectionNode>) {
        if let Some((_, done)) = stack.pop() {
            match stack.last_mut() {
                Some((_, parent)) => parent.children.push(done),
                None => roots.push(done),
            }
        }
    }

    let mut roots = Vec::new();
    let mut stack: Vec<(usize, SectionNode)> = Vec::new();
    for (level, section) in flat {
        while stack.last().is_some_and(|(open, _)| *open >= level) {
            close(&mut stack, &mut roots);
        }
        stack.push((level, section));
    }
    while !stack.is_empty() {
        close(&mut stack, &mut roots);
    }
    roots
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
