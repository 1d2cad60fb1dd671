//! Per-file structural analysis
//!
//! The scanner only depends on the [`FileAnalyzer`] trait; the bundled
//! implementation extracts function and class fragments with tree-sitter.

use crate::domain::{FileSummary, Language};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod syntax;

pub use syntax::{supported_grammars, TreeSitterAnalyzer};

/// Why one file could not be analyzed. Recorded, never fatal to a scan.
#[derive(Debug, Error)]
pub enum AnalysisFailure {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load {0} grammar: {1}")]
    Grammar(Language, String),
    #[error("parser returned no tree for {0}")]
    Parse(PathBuf),
}

pub trait FileAnalyzer {
    /// Extract the structural summary of one file.
    fn analyze(&self, path: &Path) -> Result<FileSummary, AnalysisFailure>;
}
