//! Path normalization

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and normalize
    path.replace('\\', "/")
}

/// Absolute form of `path` with symlinks resolved where the path exists.
///
/// Paths that do not exist are made absolute against the working directory
/// without touching the filesystem.
pub fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// True when any normal component of `path` equals one of `segments`.
pub fn path_has_segment(path: &Path, segments: &BTreeSet<String>) -> bool {
    path.components().any(|component| match component {
        Component::Normal(part) => segments.contains(part.to_string_lossy().as_ref()),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_match_is_whole_component() {
        let ignore: BTreeSet<String> = ["venv".to_string()].into_iter().collect();
        assert!(path_has_segment(Path::new("/p/venv/lib/x.py"), &ignore));
        assert!(!path_has_segment(Path::new("/p/myvenv/x.py"), &ignore));
    }

    #[test]
    fn resolve_path_makes_missing_paths_absolute() {
        let resolved = resolve_path(Path::new("does/not/exist.py"));
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("does/not/exist.py"));
    }
}
