//! Project scanner: walks the tree, filters, and analyzes recognized files.

use crate::analysis::{FileAnalyzer, TreeSitterAnalyzer};
use crate::domain::{FileSummary, Language, StructureSnapshot, STRUCTURE_KEY};
use crate::scan::exclude::ExclusionFilter;
use crate::scan::structure::StructureIndex;
use crate::utils::normalize_path;
use anyhow::{Context, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of one scan: per-file summaries plus the structure snapshot.
///
/// Serializes as a single map whose `__structure__` entry holds the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Keyed by root-relative path with forward slashes.
    pub files: BTreeMap<String, FileSummary>,
    pub structure: StructureSnapshot,
}

impl ScanReport {
    pub fn failures(&self) -> impl Iterator<Item = (&String, &str)> {
        self.files.iter().filter_map(|(path, s)| s.error.as_deref().map(|e| (path, e)))
    }
}

impl Serialize for ScanReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.files.len() + 1))?;
        for (path, summary) in &self.files {
            map.serialize_entry(path, summary)?;
        }
        map.serialize_entry(STRUCTURE_KEY, &self.structure)?;
        map.end()
    }
}

/// Scanner over one project root.
pub struct ProjectScanner<A = TreeSitterAnalyzer> {
    root: PathBuf,
    analyzer: A,
    follow_symlinks: bool,
}

impl ProjectScanner<TreeSitterAnalyzer> {
    pub fn new(root: PathBuf) -> Self {
        Self::with_analyzer(root, TreeSitterAnalyzer::new())
    }
}

impl<A: FileAnalyzer> ProjectScanner<A> {
    pub fn with_analyzer(root: PathBuf, analyzer: A) -> Self {
        Self { root, analyzer, follow_symlinks: false }
    }

    /// Set whether to follow symbolic links
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the project.
    ///
    /// Per-file analysis failures are recorded in [`FileSummary::error`]. Only a
    /// failure to enumerate the tree itself is returned as an error.
    pub fn scan(&self) -> Result<ScanReport> {
        if !self.root.is_dir() {
            anyhow::bail!("Path is not a directory: {}", self.root.display());
        }
        let filter = ExclusionFilter::load(&self.root)?;

        let mut structure = StructureIndex::new();
        let mut files = BTreeMap::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                    return true;
                };
                !filter.is_excluded(rel, entry.file_type().is_dir())
            });

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) if err.depth() == 0 => {
                    return Err(err).with_context(|| {
                        format!("Failed to enumerate {}", self.root.display())
                    });
                }
                Err(err) => {
                    tracing::debug!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(language) = Language::from_path(path) else {
                continue;
            };
            let Ok(rel) = path.strip_prefix(&self.root) else {
                continue;
            };

            let summary = self.analyzer.analyze(path).unwrap_or_else(|failure| {
                tracing::debug!("Analysis failed for {}: {}", path.display(), failure);
                FileSummary::failed(Some(language), failure.to_string())
            });
            structure.record(rel, summary.language);
            files.insert(normalize_path(&rel.to_string_lossy()), summary);
        }

        tracing::info!("Scanned {} files under {}", files.len(), self.root.display());
        Ok(ScanReport { files, structure: structure.snapshot() })
    }
}
