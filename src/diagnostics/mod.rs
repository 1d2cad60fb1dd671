//! Static diagnostics through external language-server tooling
//!
//! Only pyright is driven today. Tool failures are reported as diagnostics
//! with `error` severity instead of being returned as errors.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: Option<String>,
    /// 1-based line number.
    pub line: Option<u32>,
    pub message: String,
    pub severity: String,
}

impl Diagnostic {
    fn note(file: Option<String>, message: impl Into<String>, severity: &str) -> Self {
        Self { file, line: None, message: message.into(), severity: severity.to_string() }
    }
}

/// Language-server backend conventionally used for `language`.
pub fn backend_for(language: &str) -> Option<&'static str> {
    match language {
        "python" => Some("pyright"),
        "typescript" => Some("tsserver"),
        "go" => Some("gopls"),
        "rust" => Some("rust-analyzer"),
        "c" | "cpp" => Some("clangd"),
        "java" => Some("jdtls"),
        _ => None,
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PyrightReport {
    #[serde(default)]
    general_diagnostics: Vec<PyrightDiagnostic>,
}

#[derive(Debug, Deserialize)]
struct PyrightDiagnostic {
    file: Option<String>,
    #[serde(default)]
    message: String,
    severity: Option<String>,
    range: Option<PyrightRange>,
}

#[derive(Debug, Deserialize)]
struct PyrightRange {
    start: PyrightPosition,
}

#[derive(Debug, Deserialize)]
struct PyrightPosition {
    #[serde(default)]
    line: u32,
}

pub struct DiagnosticsRunner {
    language: String,
    root: PathBuf,
    pyright: String,
}

impl DiagnosticsRunner {
    pub fn new(language: &str, root: &Path) -> Self {
        Self {
            language: language.to_lowercase(),
            root: root.to_path_buf(),
            pyright: "pyright".to_string(),
        }
    }

    /// Override the pyright executable.
    pub fn pyright_binary(mut self, binary: impl Into<String>) -> Self {
        self.pyright = binary.into();
        self
    }

    /// Diagnose `target` (a file or directory), defaulting to the project root.
    pub fn run(&self, target: Option<&Path>) -> Vec<Diagnostic> {
        let target = target.unwrap_or(&self.root);
        match backend_for(&self.language) {
            Some("pyright") => {}
            Some(tool) => {
                return vec![Diagnostic::note(
                    None,
                    format!("LSP backend '{tool}' not yet implemented"),
                    "info",
                )];
            }
            None => {
                return vec![Diagnostic::note(
                    None,
                    format!("No diagnostics backend for language '{}'", self.language),
                    "info",
                )];
            }
        }

        if !target.is_dir() {
            return self.run_pyright(target);
        }

        let files: Vec<PathBuf> = WalkDir::new(target)
            .sort_by_file_name()
            .into_iter()
            .flatten()
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "py"))
            .collect();
        if files.is_empty() {
            return vec![Diagnostic::note(
                Some(target.display().to_string()),
                "No Python files found in directory.",
                "warning",
            )];
        }
        files.iter().flat_map(|file| self.run_pyright(file)).collect()
    }

    fn run_pyright(&self, file: &Path) -> Vec<Diagnostic> {
        let file_label = Some(file.display().to_string());
        let output = match Command::new(&self.pyright).arg("--outputjson").arg(file).output() {
            Ok(output) => output,
            Err(err) => {
                return vec![Diagnostic::note(
                    file_label,
                    format!("Pyright error: failed to start '{}': {err}", self.pyright),
                    "error",
                )];
            }
        };

        // pyright exits non-zero when it reports errors, so the JSON body decides.
        match parse_pyright(&String::from_utf8_lossy(&output.stdout)) {
            Some(diagnostics) => diagnostics,
            None => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let message = format!("Pyright error: {}", stderr.trim());
                vec![Diagnostic::note(file_label, message, "error")]
            }
        }
    }
}

/// Convert pyright `--outputjson` output; `None` when it is not valid JSON.
pub fn parse_pyright(json: &str) -> Option<Vec<Diagnostic>> {
    let report: PyrightReport = serde_json::from_str(json).ok()?;
    Some(
        report
            .general_diagnostics
            .into_iter()
            .map(|d| Diagnostic {
                file: d.file,
                line: Some(d.range.map_or(0, |r| r.start.line) + 1),
                message: d.message,
                severity: d.severity.unwrap_or_else(|| "info".to_string()),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parses_pyright_output() {
        let json = r#"{
            "generalDiagnostics": [
                {"file": "/p/a.py", "severity": "error", "message": "x is not defined",
                 "range": {"start": {"line": 4, "character": 0}, "end": {"line": 4, "character": 1}}},
                {"file": "/p/b.py", "message": "unused"}
            ]
        }"#;
        let diagnostics = parse_pyright(json).expect("valid json");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].line, Some(5));
        assert_eq!(diagnostics[0].severity, "error");
        assert_eq!(diagnostics[1].line, Some(1));
        assert_eq!(diagnostics[1].severity, "info");
        assert!(parse_pyright("not json").is_none());
    }

    #[test]
    fn empty_directory_warns() {
        let tmp = TempDir::new().expect("tmp dir");
        let diagnostics = DiagnosticsRunner::new("python", tmp.path()).run(None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, "warning");
        assert_eq!(diagnostics[0].message, "No Python files found in directory.");
    }

    #[test]
    fn unsupported_backend_is_informational() {
        let tmp = TempDir::new().expect("tmp dir");
        let diagnostics = DiagnosticsRunner::new("Go", tmp.path()).run(None);
        assert_eq!(diagnostics[0].severity, "info");
        assert!(diagnostics[0].message.contains("gopls"));
    }

    #[test]
    fn missing_tool_becomes_error_diagnostic() {
        let tmp = TempDir::new().expect("tmp dir");
        fs::write(tmp.path().join("a.py"), "x = 1\n").expect("write");
        let diagnostics = DiagnosticsRunner::new("python", tmp.path())
            .pyright_binary("lec-missing-pyright")
            .run(None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, "error");
        assert!(diagnostics[0].message.starts_with("Pyright error"));
    }
}
