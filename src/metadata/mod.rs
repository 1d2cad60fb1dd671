//! Project metadata: aggregate totals and structure index derived from a scan
//!
//! The canonical artifact is `.lec/project_metadata.json`, overwritten in full
//! on every scan.

use crate::domain::{entry_point_names, GeneratedSummary, Language, ProjectMetadata};
use crate::scan::ScanReport;
use crate::store::{write_atomic, StateDir};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// How the primary language is chosen among those observed in a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrimaryLanguagePolicy {
    /// Most scanned files wins; ties go to the lexicographically smallest tag.
    #[default]
    MostModules,
}

impl PrimaryLanguagePolicy {
    pub fn select(self, report: &ScanReport) -> Option<Language> {
        match self {
            PrimaryLanguagePolicy::MostModules => {
                let mut counts: BTreeMap<&'static str, (usize, Language)> = BTreeMap::new();
                for lang in report.files.values().filter_map(|s| s.language) {
                    counts.entry(lang.tag()).or_insert((0, lang)).0 += 1;
                }
                // Tags iterate in order, so a strict comparison keeps the smallest tag on ties.
                let mut best: Option<(usize, Language)> = None;
                for (count, lang) in counts.into_values() {
                    if best.map_or(true, |(top, _)| count > top) {
                        best = Some((count, lang));
                    }
                }
                best.map(|(_, lang)| lang)
            }
        }
    }
}

pub struct MetadataSummarizer<'a> {
    state: &'a StateDir,
    policy: PrimaryLanguagePolicy,
}

impl<'a> MetadataSummarizer<'a> {
    pub fn new(state: &'a StateDir) -> Self {
        Self { state, policy: PrimaryLanguagePolicy::default() }
    }

    /// Reduce a scan into project metadata and persist it as the canonical artifact.
    pub fn generate(&self, report: &ScanReport) -> Result<ProjectMetadata> {
        let metadata = self.summarize(report);
        save_metadata(self.state, &metadata)?;
        Ok(metadata)
    }

    /// Pure reduction step of [`generate`](Self::generate).
    pub fn summarize(&self, report: &ScanReport) -> ProjectMetadata {
        let project_name = self
            .state
            .project_root()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        ProjectMetadata {
            project_name,
            language: self
                .policy
                .select(report)
                .map(|lang| lang.tag().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            entry_points: detect_entry_points(report),
            generated_summary: summarize_totals(report),
            structure: report.structure.clone(),
            ..ProjectMetadata::default()
        }
    }
}

pub fn summarize_totals(report: &ScanReport) -> GeneratedSummary {
    let mut summary = GeneratedSummary::default();
    for file in report.files.values() {
        summary.modules += 1;
        summary.functions += file.functions.len();
        summary.classes += file.classes.len();
    }
    summary
}

/// Scanned files whose name marks a conventional entry point, in path order.
fn detect_entry_points(report: &ScanReport) -> Vec<String> {
    let names = entry_point_names();
    report
        .files
        .keys()
        .filter(|path| {
            let name = Path::new(path.as_str()).file_name().and_then(|n| n.to_str());
            name.is_some_and(|n| names.contains(&n))
        })
        .cloned()
        .collect()
}

pub fn save_metadata(state: &StateDir, metadata: &ProjectMetadata) -> Result<()> {
    let json =
        serde_json::to_string_pretty(metadata).context("Failed to serialize project metadata")?;
    write_atomic(&state.metadata_file(), json.as_bytes())
}

/// Canonical project metadata, or `None` if the project was never scanned.
pub fn load_metadata(state: &StateDir) -> Result<Option<ProjectMetadata>> {
    let path = state.metadata_file();
    if !path.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed reading {}", path.display()))?;
    let metadata = serde_json::from_str(&content)
        .with_context(|| format!("Invalid project metadata: {}", path.display()))?;
    Ok(Some(metadata))
}

/// Persist the raw scan mapping next to the metadata.
pub fn save_context_map(state: &StateDir, report: &ScanReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize scan mapping")?;
    write_atomic(&state.context_map_file(), json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileSummary;
    use tempfile::TempDir;

    fn summary(lang: Language, functions: usize, classes: usize) -> FileSummary {
        FileSummary {
            language: Some(lang),
            functions: vec!["f".to_string(); functions],
            classes: vec!["c".to_string(); classes],
            error: None,
        }
    }

    fn report() -> ScanReport {
        let mut report = ScanReport::default();
        report.files.insert("main.py".to_string(), summary(Language::Python, 2, 1));
        report.files.insert("core/a.py".to_string(), summary(Language::Python, 3, 0));
        report.files.insert("core/b.rs".to_string(), summary(Language::Rust, 1, 2));
        report
    }

    #[test]
    fn totals_sum_fragments() {
        let totals = summarize_totals(&report());
        assert_eq!(
            totals,
            GeneratedSummary { modules: 3, functions: 6, classes: 3, score: 0 }
        );
    }

    #[test]
    fn primary_language_is_most_frequent() {
        let lang = PrimaryLanguagePolicy::MostModules.select(&report());
        assert_eq!(lang, Some(Language::Python));
    }

    #[test]
    fn primary_language_ties_break_lexicographically() {
        let mut report = ScanReport::default();
        report.files.insert("a.rs".to_string(), summary(Language::Rust, 0, 0));
        report.files.insert("b.go".to_string(), summary(Language::Go, 0, 0));
        assert_eq!(PrimaryLanguagePolicy::MostModules.select(&report), Some(Language::Go));
        assert_eq!(PrimaryLanguagePolicy::MostModules.select(&ScanReport::default()), None);
    }

    #[test]
    fn generate_persists_and_overwrites() {
        let tmp = TempDir::new().expect("tmp dir");
        let state = StateDir::new(tmp.path());
        let summarizer = MetadataSummarizer::new(&state);

        let first = summarizer.generate(&report()).expect("generate");
        assert_eq!(first.language, "python");
        assert_eq!(first.entry_points, vec!["main.py".to_string()]);
        assert_eq!(load_metadata(&state).expect("load"), Some(first));

        let second = summarizer.generate(&ScanReport::default()).expect("regenerate");
        assert_eq!(second.language, "unknown");
        assert_eq!(second.generated_summary.modules, 0);
        assert_eq!(load_metadata(&state).expect("load"), Some(second));
    }
}
