//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! Specifically, we try to find a sowtree.toml, and if present we load settings from there.
//! This covers editor wrapping, table of contents layout and logging.

use crate::error::{Error, Result};
use facet::Facet;
use std::fs;
use std::path::Path;

/// File looked for in the working directory.
pub const CONFIG_FILE: &str = "sowtree.toml";

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from sowtree.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 100)]
    /// Column at which the section editor soft-wraps body text (0 uses the full width).
    pub wrap_width: usize,
    #[facet(default = 2)]
    /// Page given to the first section in the table of contents.
    pub toc_start_page: u32,
    #[facet(default = 72)]
    /// Line width of the rendered table of contents.
    pub toc_width: usize,
    #[facet(default = 4)]
    /// Spaces of indentation per table of contents level.
    pub toc_indent: usize,
    #[facet(default = "info".to_string())]
    /// Default log level: error, warn, info, debug or trace.
    pub log_level: String,
    #[facet(default)]
    /// Optional log file; the interactive editor only logs here.
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wrap_width: 100,
            toc_start_page: 2,
            toc_width: 72,
            toc_indent: 4,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from sowtree.toml if present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from `path`, using defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).map_err(|message| Error::Config {
                path: path.to_path_buf(),
                message,
            }),
            Err(_) => Ok(Self::default()),
        }
    }

    fn parse(contents: &str) -> std::result::Result<Self, String> {
        facet_toml::from_str::<Self>(contents).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
