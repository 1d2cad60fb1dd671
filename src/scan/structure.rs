//! Folder and language-mix accounting for a scan.

use crate::domain::{FolderCounts, Language, StructureSnapshot};
use std::path::{Component, Path, PathBuf};

/// Counts files and languages for every ancestor folder of each recorded file.
///
/// Purely additive; one instance per scan.
#[derive(Debug, Default)]
pub struct StructureIndex {
    folders: StructureSnapshot,
}

impl StructureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file at a root-relative path.
    ///
    /// `a/b/c.py` bumps `a` and `a/b`; a file at the root bumps nothing.
    pub fn record(&mut self, relative_path: &Path, language: Option<Language>) {
        let parts: Vec<_> = relative_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();

        let mut folder = PathBuf::new();
        for part in parts.iter().take(parts.len().saturating_sub(1)) {
            folder.push(part);
            let key = folder.to_string_lossy().replace('\\', "/");
            let counts: &mut FolderCounts = self.folders.entry(key).or_default();
            counts.files += 1;
            if let Some(lang) = language {
                *counts.languages.entry(lang.tag().to_string()).or_insert(0) += 1;
            }
        }
    }

    pub fn snapshot(&self) -> StructureSnapshot {
        self.folders.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_every_ancestor() {
        let mut index = StructureIndex::new();
        index.record(Path::new("a/b/c.py"), Some(Language::Python));
        index.record(Path::new("a/d.rs"), Some(Language::Rust));
        index.record(Path::new("top.py"), Some(Language::Python));

        let snap = index.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap["a"].files, 2);
        assert_eq!(snap["a"].languages["python"], 1);
        assert_eq!(snap["a"].languages["rust"], 1);
        assert_eq!(snap["a/b"].files, 1);
        assert!(!snap["a/b"].languages.contains_key("rust"));
    }

    #[test]
    fn unknown_language_counts_only_files() {
        let mut index = StructureIndex::new();
        index.record(Path::new("lib/x.py"), None);
        let snap = index.snapshot();
        assert_eq!(snap["lib"].files, 1);
        assert!(snap["lib"].languages.is_empty());
    }
}
