//! Append-only learning log of completions, corrections and test feedback.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct CompletionEntry<'a> {
    timestamp: DateTime<Local>,
    prompt: &'a str,
    output: &'a str,
    accepted: bool,
}

#[derive(Debug, Serialize)]
struct CorrectionEntry<'a> {
    timestamp: DateTime<Local>,
    before: &'a str,
    after: &'a str,
    reason: &'a str,
}

#[derive(Debug, Serialize)]
struct TestFeedbackEntry<'a> {
    timestamp: DateTime<Local>,
    file: &'a str,
    result: &'static str,
    trace: Option<&'a str>,
}

pub struct LearnTracker {
    base: PathBuf,
}

impl LearnTracker {
    pub fn open(base: &Path) -> Result<Self> {
        fs::create_dir_all(base)
            .with_context(|| format!("Failed to create {}", base.display()))?;
        Ok(Self { base: base.to_path_buf() })
    }

    pub fn log_completion(&self, prompt: &str, output: &str, accepted: bool) -> Result<()> {
        let entry = CompletionEntry { timestamp: Local::now(), prompt, output, accepted };
        self.append("completions.jsonl", &entry)
    }

    pub fn log_correction(&self, before: &str, after: &str, reason: &str) -> Result<()> {
        let entry = CorrectionEntry { timestamp: Local::now(), before, after, reason };
        self.append("corrections.jsonl", &entry)
    }

    pub fn log_test_feedback(&self, file: &str, passed: bool, trace: Option<&str>) -> Result<()> {
        let result = if passed { "pass" } else { "fail" };
        let entry = TestFeedbackEntry { timestamp: Local::now(), file, result, trace };
        self.append("test_feedback.jsonl", &entry)
    }

    fn append<T: Serialize>(&self, file_name: &str, entry: &T) -> Result<()> {
        let path = self.base.join(file_name);
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to append to {}", path.display()))?;
        Ok(())
    }
}
