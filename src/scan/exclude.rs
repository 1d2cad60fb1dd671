//! Ignore-file based path exclusion.

use crate::domain::default_ignore_patterns;
use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::Path;

const IGNORE_FILE: &str = ".gitignore";

/// Decides whether a root-relative path is excluded from scanning.
///
/// Patterns come from the project's `.gitignore` when present, otherwise from
/// the built-in default set. Matching follows gitignore rules, including
/// directory markers: a file is excluded when it or any parent directory
/// matches.
pub struct ExclusionFilter {
    matcher: Gitignore,
    from_ignore_file: bool,
}

impl ExclusionFilter {
    pub fn load(root: &Path) -> Result<Self> {
        let ignore_file = root.join(IGNORE_FILE);
        if ignore_file.is_file() {
            let content = fs::read_to_string(&ignore_file)
                .with_context(|| format!("Failed reading {}", ignore_file.display()))?;
            let lines: Vec<&str> = content.lines().collect();
            let matcher = build_matcher(root, &lines)?;
            return Ok(Self { matcher, from_ignore_file: true });
        }
        Self::from_patterns(root, default_ignore_patterns())
    }

    pub fn from_patterns(root: &Path, patterns: &[&str]) -> Result<Self> {
        Ok(Self { matcher: build_matcher(root, patterns)?, from_ignore_file: false })
    }

    /// Whether patterns were read from the project's ignore file.
    pub fn from_ignore_file(&self) -> bool {
        self.from_ignore_file
    }

    pub fn is_excluded(&self, relative_path: &Path, is_dir: bool) -> bool {
        if relative_path.as_os_str().is_empty() || relative_path.has_root() {
            return false;
        }
        self.matcher.matched_path_or_any_parents(relative_path, is_dir).is_ignore()
    }
}

fn build_matcher(root: &Path, patterns: &[&str]) -> Result<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        if let Err(err) = builder.add_line(None, pattern) {
            tracing::warn!("Skipping invalid ignore pattern '{}': {}", pattern, err);
        }
    }
    builder.build().context("Failed to build ignore matcher")
}
