//! Format trait and implementations for documents stored outside JSON.
//!
//! A format supplies the tree-sitter grammar and queries used to find section headings and
//! tables in a source file, and knows how to write a document back out.

pub mod markdown;

use crate::document::Document;

/// Grammar, queries and renderer for one external document format.
pub trait Format {
    /// File extensions (without the dot) recognised as this format.
    fn file_extensions(&self) -> &[&'static str];

    /// Tree-sitter grammar that parses this format.
    fn language(&self) -> tree_sitter::Language;

    /// Query capturing every section heading as `@heading`.
    fn section_query(&self) -> &str;

    /// Query capturing every embedded table as `@table`.
    fn table_query(&self) -> &str;

    /// Nesting level (1 for top level) and title of a captured heading node.
    fn heading(&self, node: tree_sitter::Node<'_>, source: &str) -> Option<(usize, String)>;

    /// Cell text of a captured table, given the table's source text.
    fn table_cells(&self, table_source: &str) -> Vec<Vec<String>>;

    /// Renders the sections of a document in this format.
    fn export(&self, document: &Document) -> String;

    /// Recovers section body text from its exported form.
    fn decode_content(&self, text: &str) -> String {
        text.to_string()
    }
}
