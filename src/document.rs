//! The Statement of Work document: cover page, running header and footer, and the forest.
//!
//! Documents persist as pretty-printed JSON using the same camelCase keys as the browser
//! editor's save files, so files move freely between the two. Loading trusts the stored
//! section numbers; it only checks the structural invariants that the tree operations rely
//! on.

use crate::error::{Error, Result};
use crate::forest::{Forest, SectionUpdate};
use crate::formats::Format;
use crate::section::{check_dimensions, SectionId, SectionNode};
use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// Token in header and footer zones that is replaced by the page number.
pub const PAGE_TOKEN: &str = "{PAGE}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Fields printed on the cover page.
pub struct CoverPage {
    /// Main title, usually "Statement of Work".
    pub title: String,
    /// Project reference such as `SOW-2026-001`.
    pub project_number: String,
    /// Product or client the work is for.
    pub client_name: String,
    /// Building identifier.
    pub building: String,
    /// Site location.
    pub location: String,
    /// Author name.
    pub prepared_by: String,
    /// Author's team or department.
    pub department: String,
    /// Issue date as `YYYY-MM-DD`.
    pub date: String,
    /// Document version.
    pub version: String,
    /// Confidentiality marking.
    pub confidentiality: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Where the page number is printed.
pub enum PageNumberPosition {
    /// Centre of the footer.
    FooterCenter,
    /// Right of the footer.
    FooterRight,
    /// Right of the header.
    HeaderRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One of the six running header and footer text zones.
pub enum Zone {
    /// Header, left.
    HeaderLeft,
    /// Header, centre.
    HeaderCenter,
    /// Header, right.
    HeaderRight,
    /// Footer, left.
    FooterLeft,
    /// Footer, centre.
    FooterCenter,
    /// Footer, right.
    FooterRight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Running header and footer repeated on every page after the cover.
pub struct HeaderFooter {
    /// Header, left zone.
    pub header_left: String,
    /// Header, centre zone.
    pub header_center: String,
    /// Header, right zone.
    pub header_right: String,
    /// Footer, left zone.
    pub footer_left: String,
    /// Footer, centre zone.
    pub footer_center: String,
    /// Footer, right zone.
    pub footer_right: String,
    /// Whether page numbers are printed at all.
    pub show_page_numbers: bool,
    /// Zone reserved for the page number.
    pub page_number_position: PageNumberPosition,
}

impl HeaderFooter {
    /// Raw text of a zone, with any page token left in place.
    #[must_use]
    pub fn zone(&self, zone: Zone) -> &str {
        match zone {
            Zone::HeaderLeft => &self.header_left,
            Zone::HeaderCenter => &self.header_center,
            Zone::HeaderRight => &self.header_right,
            Zone::FooterLeft => &self.footer_left,
            Zone::FooterCenter => &self.footer_center,
            Zone::FooterRight => &self.footer_right,
        }
    }

    /// Text of a zone as printed on `page`.
    #[must_use]
    pub fn resolve(&self, zone: Zone, page: u32) -> String {
        resolve_page_token(self.zone(zone), page)
    }
}

/// Replaces the first page token in `text` with `page`.
#[must_use]
pub fn resolve_page_token(text: &str, page: u32) -> String {
    text.replacen(PAGE_TOKEN, &page.to_string(), 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A complete Statement of Work.
pub struct Document {
    /// Name shown in the editor and used for file names.
    pub document_name: String,
    /// Cover page fields.
    pub cover_page: CoverPage,
    /// Running header and footer.
    pub header_footer: HeaderFooter,
    /// Numbered sections.
    pub sections: Forest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Answers from the new-document form. Blank or missing answers keep the starter values.
pub struct DocumentSetup {
    /// Document name.
    pub document_name: Option<String>,
    /// Cover title.
    pub title: Option<String>,
    /// Project number; also becomes the left footer.
    pub project_number: Option<String>,
    /// Client or product name.
    pub client_name: Option<String>,
    /// Building identifier.
    pub building: Option<String>,
    /// Site location.
    pub location: Option<String>,
    /// Author name.
    pub prepared_by: Option<String>,
    /// Team or department.
    pub department: Option<String>,
    /// Issue date as `YYYY-MM-DD`; also rewrites the left header.
    pub date: Option<String>,
    /// Seeds the body of the first section.
    pub description: Option<String>,
    /// Confidentiality marking.
    pub confidentiality: Option<String>,
}

impl DocumentSetup {
    /// Fills a blank project number with a generated one and a blank date with `today`.
    #[must_use]
    pub fn with_defaults(mut self, today: NaiveDate) -> Self {
        if given(self.project_number.as_ref()).is_none() {
            self.project_number = Some(generate_project_number(today));
        }
        if given(self.date.as_ref()).is_none() {
            self.date = Some(today.format("%Y-%m-%d").to_string());
        }
        self
    }
}

fn seeded(id: &str, number: &str, title: &str, content: &str) -> SectionNode {
    SectionNode {
        id: SectionId::from(id),
        number: number.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        tables: Vec::new(),
        children: Vec::new(),
    }
}

fn given(answer: Option<&String>) -> Option<&str> {
    answer.map(String::as_str).filter(|a| !a.is_empty())
}

impl Document {
    #[must_use]
    /// The starter document every new Statement of Work begins from, dated `today`.
    pub fn starter(today: NaiveDate) -> Self {
        let sections = vec![
            seeded(
                "sec-1",
                "1.0",
                "Project Overview",
                "This Statement of Work (SOW) outlines the scope, deliverables, and requirements for the engagement.",
            )
            .child(seeded(
                "sec-1-1",
                "1.1",
                "Background",
                "Background information goes here...",
            ))
            .child(seeded(
                "sec-1-2",
                "1.2",
                "Objectives",
                "The primary objectives of this engagement...",
            )),
            seeded(
                "sec-2",
                "2.0",
                "Scope of Work",
                "This section defines the detailed scope of work to be performed.",
            )
            .child(seeded(
                "sec-2-1",
                "2.1",
                "In Scope",
                "Items included within the scope of this engagement...",
            ))
            .child(seeded(
                "sec-2-2",
                "2.2",
                "Out of Scope",
                "Items not explicitly mentioned are considered out of scope.",
            )),
            seeded(
                "sec-3",
                "3.0",
                "Deliverables",
                "The following deliverables will be provided as part of this engagement.",
            ),
        ];

        Self {
            document_name: "Untitled Document".to_string(),
            cover_page: CoverPage {
                title: "Statement of Work".to_string(),
                project_number: "SOW-2026-001".to_string(),
                client_name: "Product Name".to_string(),
                building: "3001".to_string(),
                location: "Norman, Oklahoma".to_string(),
                prepared_by: "Your Name".to_string(),
                department: "Department Name".to_string(),
                date: today.format("%Y-%m-%d").to_string(),
                version: "1.0".to_string(),
                confidentiality: "Confidential".to_string(),
            },
            header_footer: HeaderFooter {
                header_left: "Statement of Work\n3 February 2025".to_string(),
                header_center: String::new(),
                header_right: String::new(),
                footer_left: "SOW-2026-001".to_string(),
                footer_center: String::new(),
                footer_right: format!("Page {PAGE_TOKEN}"),
                show_page_numbers: true,
                page_number_position: PageNumberPosition::FooterRight,
            },
            sections: Forest::new(sections),
        }
    }

    #[must_use]
    /// Starter document with the new-document form answers applied.
    pub fn from_setup(setup: &DocumentSetup, today: NaiveDate) -> Self {
        let mut doc = Self::starter(today);
        let cover = &mut doc.cover_page;

        if let Some(name) = given(setup.document_name.as_ref()) {
            doc.document_name = name.to_string();
        }
        if let Some(title) = given(setup.title.as_ref()) {
            cover.title = title.to_string();
        }
        if let Some(number) = given(setup.project_number.as_ref()) {
            cover.project_number = number.to_string();
            doc.header_footer.footer_left = number.to_string();
        }
        for (answer, field) in [
            (&setup.client_name, &mut cover.client_name),
            (&setup.building, &mut cover.building),
            (&setup.location, &mut cover.location),
            (&setup.prepared_by, &mut cover.prepared_by),
            (&setup.department, &mut cover.department),
            (&setup.confidentiality, &mut cover.confidentiality),
        ] {
            if let Some(value) = given(answer.as_ref()) {
                *field = value.to_string();
            }
        }
        if let Some(date) = given(setup.date.as_ref()) {
            cover.date = date.to_string();
            if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                let title = given(setup.title.as_ref()).unwrap_or("Statement of Work");
                doc.header_footer.header_left =
                    format!("{title}\n{}", parsed.format("%B %-d, %Y"));
            }
        }
        if let Some(description) = given(setup.description.as_ref()) {
            if let Some(first) = doc.sections.sections().first() {
                let id = first.id.clone();
                doc.sections = doc.sections.update(
                    &id,
                    &SectionUpdate::default().with_content(description),
                );
            }
        }

        doc
    }

    /// File name the editor proposes when saving, e.g. `my-sow-2026-03-01.json`.
    #[must_use]
    pub fn suggested_file_name(&self, today: NaiveDate) -> String {
        let mut slug = String::new();
        let mut in_space = false;
        for c in self.document_name.chars() {
            if c.is_whitespace() {
                if !in_space {
                    slug.push('-');
                }
                in_space = true;
            } else {
                slug.extend(c.to_lowercase());
                in_space = false;
            }
        }
        format!("{slug}-{}.json", today.format("%Y-%m-%d"))
    }

    /// Checks the invariants the tree operations depend on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invalid`] when there are no sections, an id repeats, or a table's
    /// grid does not match its declared dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(Error::Invalid("document has no sections".to_string()));
        }

        let mut section_ids = HashSet::new();
        let mut table_ids = HashSet::new();
        for (section, _) in self.sections.walk() {
            if !section_ids.insert(&section.id) {
                return Err(Error::Invalid(format!("duplicate section id {}", section.id)));
            }
            for table in &section.tables {
                if !table_ids.insert(&table.id) {
                    return Err(Error::Invalid(format!("duplicate table id {}", table.id)));
                }
                check_dimensions(table.rows, table.cols).map_err(|e| {
                    Error::Invalid(format!("table {} has invalid dimensions: {e}", table.id))
                })?;
                if !table.is_rectangular() {
                    return Err(Error::Invalid(format!(
                        "table {} does not hold {} rows of {} cells",
                        table.id, table.rows, table.cols
                    )));
                }
            }
        }
        Ok(())
    }

    /// Decodes and validates a document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON and [`Error::Invalid`] for broken invariants.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Self = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Encodes the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialisation fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a valid document.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_json(&json)?;
        info!(path = %path.display(), sections = doc.sections.len(), "loaded document");
        Ok(doc)
    }

    /// Writes the document to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "saved document");
        Ok(())
    }

    /// Renders the document in another format and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing fails.
    pub fn export_to(&self, format: &impl Format, path: &Path) -> Result<()> {
        fs::write(path, format.export(self)).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "exported document");
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::starter(chrono::Local::now().date_naive())
    }
}

/// Proposes a project number `SOW-<year>-<NNN>` with a random three-digit sequence.
#[must_use]
pub fn generate_project_number(today: NaiveDate) -> String {
    let seq: u32 = rand::rng().random_range(1..=999);
    format!("SOW-{}-{seq:03}", today.year())
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
