//! Core data types shared across scanning, metadata, sessions and context assembly.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

/// Name of the hidden per-project state directory.
pub const STATE_DIR_NAME: &str = ".lec";

/// Key under which the structure snapshot is stored in a serialized scan mapping.
pub const STRUCTURE_KEY: &str = "__structure__";

/// Source languages recognized by the scanner.
///
/// One extension per language. Languages without a bundled grammar still
/// take part in scanning; they just yield empty summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "javascript")]
    JavaScript,
    #[serde(rename = "typescript")]
    TypeScript,
    #[serde(rename = "java")]
    Java,
    #[serde(rename = "c")]
    C,
    #[serde(rename = "cpp")]
    Cpp,
    #[serde(rename = "c_sharp")]
    CSharp,
    #[serde(rename = "go")]
    Go,
    #[serde(rename = "rust")]
    Rust,
    #[serde(rename = "ruby")]
    Ruby,
    #[serde(rename = "php")]
    Php,
    #[serde(rename = "lua")]
    Lua,
}

impl Language {
    pub const ALL: [Language; 12] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Go,
        Language::Rust,
        Language::Ruby,
        Language::Php,
        Language::Lua,
    ];

    /// Tag used in persisted artifacts and structure counters.
    pub fn tag(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "c_sharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Lua => "lua",
        }
    }

    /// File extension (without the leading dot).
    pub fn extension(self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::JavaScript => "js",
            Language::TypeScript => "ts",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "cs",
            Language::Go => "go",
            Language::Rust => "rs",
            Language::Ruby => "rb",
            Language::Php => "php",
            Language::Lua => "lua",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        Language::ALL.into_iter().find(|lang| lang.extension() == ext)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|e| e.to_str()).and_then(Language::from_extension)
    }

    /// Whether a syntax grammar ships with the analyzer for this language.
    pub fn has_grammar(self) -> bool {
        matches!(
            self,
            Language::Python
                | Language::Rust
                | Language::JavaScript
                | Language::TypeScript
                | Language::Go
        )
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Verify the extension table is a bijection between languages, tags and extensions.
///
/// Run once at startup; a failure means the table itself is broken.
pub fn check_language_table() -> Result<()> {
    let mut tags = HashSet::new();
    let mut extensions = HashSet::new();
    for lang in Language::ALL {
        if !tags.insert(lang.tag()) {
            anyhow::bail!("Duplicate language tag '{}'", lang.tag());
        }
        if !extensions.insert(lang.extension()) {
            anyhow::bail!("Extension '.{}' mapped to more than one language", lang.extension());
        }
        if Language::from_extension(lang.extension()) != Some(lang) {
            anyhow::bail!("Extension '.{}' does not resolve back to {}", lang.extension(), lang);
        }
    }
    Ok(())
}

/// Structural summary of one scanned file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub language: Option<Language>,
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileSummary {
    pub fn empty(language: Option<Language>) -> Self {
        Self { language, ..Self::default() }
    }

    pub fn failed(language: Option<Language>, reason: impl Into<String>) -> Self {
        Self { language, error: Some(reason.into()), ..Self::default() }
    }
}

/// Per-folder counters: total files plus one counter per observed language tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderCounts {
    pub files: usize,
    #[serde(flatten)]
    pub languages: BTreeMap<String, usize>,
}

pub type StructureSnapshot = BTreeMap<String, FolderCounts>;

/// Aggregate totals over one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSummary {
    pub modules: usize,
    pub functions: usize,
    pub classes: usize,
    /// Reserved; always zero for now.
    pub score: u64,
}

/// Project-level metadata derived from a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMetadata {
    pub project_name: String,
    pub language: String,
    pub entry_points: Vec<String>,
    pub test_paths: Vec<String>,
    pub ignore_paths: BTreeSet<String>,
    pub description: String,
    pub generated_summary: GeneratedSummary,
    pub structure: StructureSnapshot,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            language: "unknown".to_string(),
            entry_points: Vec::new(),
            test_paths: vec!["tests/".to_string()],
            ignore_paths: default_ignore_paths().iter().map(|s| s.to_string()).collect(),
            description: String::new(),
            generated_summary: GeneratedSummary::default(),
            structure: StructureSnapshot::new(),
        }
    }
}

/// Ignore-file patterns used when the project has no `.gitignore`.
pub fn default_ignore_patterns() -> &'static [&'static str] {
    &[
        ".venv/",
        "venv/",
        "__pycache__/",
        "*.pyc",
        "*.gguf",
        "*.bin",
        ".lec/",
        ".git/",
        "node_modules/",
    ]
}

/// Path segments skipped entirely during context assembly.
pub fn default_ignore_paths() -> &'static [&'static str] {
    &["venv", ".venv", "__pycache__", ".git", "node_modules"]
}

pub fn default_priority_folders() -> &'static [&'static str] {
    &["routes", "core", "models", "src"]
}

/// File names treated as conventional entry points.
pub fn entry_point_names() -> &'static [&'static str] {
    &[
        "main.py",
        "__main__.py",
        "app.py",
        "cli.py",
        "manage.py",
        "main.rs",
        "lib.rs",
        "main.go",
        "index.js",
        "index.ts",
        "server.js",
        "main.js",
        "main.ts",
        "Main.java",
        "main.c",
        "main.cpp",
        "Program.cs",
        "main.rb",
        "index.php",
        "main.lua",
    ]
}

/// Tool configuration, discovered from `lec.toml` / `lec.yml` at the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub budget_chars: usize,
    pub per_file_cap: usize,
    #[serde(deserialize_with = "crate::config::string_or_list")]
    pub priority_folders: Vec<String>,
    pub model: ModelConfig,
    pub diagnostics: DiagnosticsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            budget_chars: crate::context::DEFAULT_BUDGET_CHARS,
            per_file_cap: crate::context::DEFAULT_PER_FILE_CAP,
            priority_folders: default_priority_folders().iter().map(|s| s.to_string()).collect(),
            model: ModelConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Executable of a llama.cpp-compatible command-line runner.
    pub binary: String,
    pub model_path: String,
    pub context_size: usize,
    pub threads: usize,
    pub complete_max_tokens: usize,
    pub explain_max_tokens: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            binary: "llama-cli".to_string(),
            model_path: "models/Phi-3-mini-4k-instruct-q4.gguf".to_string(),
            context_size: 2048,
            threads: 4,
            complete_max_tokens: 80,
            explain_max_tokens: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Language whose backend `diagnose` uses when none is given on the command line.
    pub language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_table_is_consistent() {
        check_language_table().expect("language table");
    }

    #[test]
    fn language_from_path_uses_extension() {
        assert_eq!(Language::from_path(Path::new("src/app.py")), Some(Language::Python));
        assert_eq!(Language::from_path(Path::new("lib/x.cs")), Some(Language::CSharp));
        assert_eq!(Language::from_path(Path::new("README.md")), None);
        assert_eq!(Language::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn folder_counts_serialize_flat() {
        let mut counts = FolderCounts { files: 3, ..FolderCounts::default() };
        counts.languages.insert("python".to_string(), 2);
        let value = serde_json::to_value(&counts).expect("json");
        assert_eq!(value, serde_json::json!({ "files": 3, "python": 2 }));
    }

    #[test]
    fn summary_language_uses_tag() {
        let summary = FileSummary::empty(Some(Language::CSharp));
        let value = serde_json::to_value(&summary).expect("json");
        assert_eq!(value["language"], "c_sharp");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn metadata_defaults_fill_missing_fields() {
        let meta: ProjectMetadata =
            serde_json::from_str(r#"{"project_name": "demo"}"#).expect("parse");
        assert_eq!(meta.project_name, "demo");
        assert_eq!(meta.language, "unknown");
        assert!(meta.ignore_paths.contains("node_modules"));
    }
}
