//! sowtree: numbered section trees for Statement of Work documents.
//!
//! A document is a forest of sections. Every edit goes through pure operations that return
//! a new forest, and structural edits are followed by a full renumbering pass so that
//! section numbers always reflect position.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod config;
pub mod document;
pub mod error;
pub mod forest;
pub mod formats;
pub mod input;
pub mod logging;
pub mod numbering;
pub mod section;
pub mod toc;
pub mod ui;

pub use document::Document;
pub use error::{Error, Result, TreeError};
pub use forest::{Forest, SectionUpdate};
pub use section::{SectionId, SectionNode, TableData, TableId};

#[cfg(test)]
#[path = "tests/properties.rs"]
mod properties;
