//! Relevance-ranked, budgeted context assembly
//!
//! Candidates are ranked as: the target file, existing entry points, then every
//! recognized source file under the priority folders in walk order. Each file
//! is capped at a fixed length, and assembly stops once the running length
//! passes the budget. The check runs after appending, so the output can exceed
//! the budget by at most one file's contribution; files are never cut at the
//! budget boundary.

use crate::domain::{default_priority_folders, Language, ProjectMetadata};
use crate::scan::ExclusionFilter;
use crate::utils::{normalize_path, path_has_segment, resolve_path};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const TRIM_MARKER: &str = "\n# ...trimmed...\n";
pub const DEFAULT_PER_FILE_CAP: usize = 800;
pub const DEFAULT_BUDGET_CHARS: usize = 1500;

pub struct ContextBuilder<'a> {
    root: PathBuf,
    metadata: &'a ProjectMetadata,
    per_file_cap: usize,
    priority_folders: Vec<String>,
    exclusion: Option<ExclusionFilter>,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(root: &Path, metadata: &'a ProjectMetadata) -> Self {
        Self {
            root: resolve_path(root),
            metadata,
            per_file_cap: DEFAULT_PER_FILE_CAP,
            priority_folders: default_priority_folders().iter().map(|s| s.to_string()).collect(),
            exclusion: None,
        }
    }

    /// Set the per-file character cap, independent of the overall budget
    pub fn per_file_cap(mut self, cap: usize) -> Self {
        self.per_file_cap = cap;
        self
    }

    pub fn priority_folders(mut self, folders: Vec<String>) -> Self {
        self.priority_folders = folders;
        self
    }

    /// Also drop candidates the project's ignore patterns exclude from scanning.
    pub fn exclusion(mut self, filter: ExclusionFilter) -> Self {
        self.exclusion = Some(filter);
        self
    }

    /// Candidate files in relevance order, deduplicated and with ignored paths removed.
    pub fn rank(&self, target: &Path) -> Vec<PathBuf> {
        let mut ranked = vec![resolve_path(target)];

        for entry in &self.metadata.entry_points {
            let path = self.root.join(entry);
            if path.exists() {
                ranked.push(resolve_path(&path));
            }
        }

        for folder in &self.priority_folders {
            let folder_path = self.root.join(folder);
            if !folder_path.is_dir() {
                continue;
            }
            for entry in WalkDir::new(&folder_path).sort_by_file_name().into_iter().flatten() {
                if entry.file_type().is_file() && Language::from_path(entry.path()).is_some() {
                    ranked.push(resolve_path(entry.path()));
                }
            }
        }

        let mut seen = HashSet::new();
        ranked.retain(|path| !self.is_ignored(path) && seen.insert(path.clone()));
        ranked
    }

    fn is_ignored(&self, path: &Path) -> bool {
        if path_has_segment(path, &self.metadata.ignore_paths) {
            return true;
        }
        match (&self.exclusion, path.strip_prefix(&self.root)) {
            (Some(filter), Ok(rel)) => filter.is_excluded(rel, false),
            _ => false,
        }
    }

    /// Assemble context for `target` under a soft character budget.
    pub fn build(&self, target: &Path, budget_chars: usize) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut total = 0usize;

        for path in self.rank(target) {
            let code = match fs::read_to_string(&path) {
                Ok(code) => code,
                Err(err) => {
                    tracing::debug!("Skipping unreadable candidate {}: {}", path.display(), err);
                    continue;
                }
            };
            let code = trim_to_cap(&code, self.per_file_cap);
            let part = format!("# File: {}\n{}", self.display_path(&path), code);
            total += part.chars().count();
            parts.push(part);
            if total > budget_chars {
                break;
            }
        }

        parts.join("\n\n")
    }

    fn display_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => normalize_path(&rel.to_string_lossy()),
            Err(_) => path.display().to_string(),
        }
    }
}

/// Truncate to `cap` characters, appending [`TRIM_MARKER`] when anything was cut.
pub fn trim_to_cap(code: &str, cap: usize) -> String {
    match code.char_indices().nth(cap) {
        Some((byte_idx, _)) => format!("{}{}", &code[..byte_idx], TRIM_MARKER),
        None => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(&path, content).expect("write");
        path
    }

    #[test]
    fn rank_orders_target_entry_points_then_priority_folders() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        let target = write(root, "feature.py", "x = 1\n");
        write(root, "main.py", "def main(): pass\n");
        write(root, "core/b.py", "b = 1\n");
        write(root, "core/a.py", "a = 1\n");
        write(root, "src/lib.rs", "fn x() {}\n");
        write(root, "src/notes.txt", "not code\n");

        let metadata = ProjectMetadata {
            entry_points: vec!["main.py".to_string(), "missing.py".to_string()],
            ..ProjectMetadata::default()
        };
        let builder = ContextBuilder::new(root, &metadata);
        let ranked = builder.rank(&target);

        let rel: Vec<String> = ranked.iter().map(|p| builder.display_path(p)).collect();
        assert_eq!(rel, vec!["feature.py", "main.py", "core/a.py", "core/b.py", "src/lib.rs"]);
    }

    #[test]
    fn rank_deduplicates_target_found_in_priority_folder() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        let target = write(root, "src/app.py", "app = 1\n");
        let metadata = ProjectMetadata {
            entry_points: vec!["src/app.py".to_string()],
            ..ProjectMetadata::default()
        };

        let ranked = ContextBuilder::new(root, &metadata).rank(&target);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn ignored_segments_are_skipped() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        let target = write(root, "app.py", "app = 1\n");
        write(root, "src/node_modules/dep.js", "function dep() {}\n");
        write(root, "src/venv/site.py", "site = 1\n");
        write(root, "src/ok.py", "ok = 1\n");

        let metadata = ProjectMetadata::default();
        let context = ContextBuilder::new(root, &metadata).build(&target, 10_000);
        assert!(context.contains("# File: src/ok.py"));
        assert!(!context.contains("node_modules"));
        assert!(!context.contains("venv"));
    }

    #[test]
    fn exclusion_filter_drops_ignored_candidates() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        let target = write(root, "app.py", "app = 1\n");
        write(root, "src/generated/out.py", "out = 1\n");
        write(root, "src/kept.py", "kept = 1\n");
        write(root, ".gitignore", "generated/\n");

        let metadata = ProjectMetadata::default();
        let filter = ExclusionFilter::load(root).expect("filter");
        let context =
            ContextBuilder::new(root, &metadata).exclusion(filter).build(&target, 10_000);
        assert!(context.contains("src/kept.py"));
        assert!(!context.contains("generated"));
    }

    #[test]
    fn soft_budget_appends_first_overflowing_file_then_stops() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        let target = write(root, "target.py", &"t".repeat(50));
        write(root, "src/big.py", &"b".repeat(2000));
        write(root, "src/later.py", "later = 1\n");

        let metadata = ProjectMetadata::default();
        let context = ContextBuilder::new(root, &metadata).build(&target, 100);

        assert!(context.starts_with(&format!("# File: target.py\n{}", "t".repeat(50))));
        assert!(context.contains("# File: src/big.py"));
        assert!(!context.contains("src/later.py"));
        assert!(context.chars().count() > 100);
        assert!(context.trim_end().ends_with("# ...trimmed..."));
    }

    #[test]
    fn long_files_are_trimmed_with_marker() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        let target = write(root, "long.py", &"x".repeat(900));

        let metadata = ProjectMetadata::default();
        let context = ContextBuilder::new(root, &metadata).build(&target, 100_000);
        let expected =
            format!("# File: long.py\n{}{}", "x".repeat(DEFAULT_PER_FILE_CAP), TRIM_MARKER);
        assert_eq!(context, expected);
    }

    #[test]
    fn unreadable_target_is_skipped() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        write(root, "src/a.py", "a = 1\n");

        let metadata = ProjectMetadata::default();
        let context = ContextBuilder::new(root, &metadata).build(&root.join("gone.py"), 1000);
        assert_eq!(context, "# File: src/a.py\na = 1\n");
    }

    #[test]
    fn trim_respects_char_boundaries() {
        assert_eq!(trim_to_cap("héllo", 2), format!("hé{TRIM_MARKER}"));
        assert_eq!(trim_to_cap("abc", 3), "abc");
    }
}
