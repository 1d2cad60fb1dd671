//! Diagnose command implementation

use super::utils::Project;
use crate::diagnostics::DiagnosticsRunner;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct DiagnoseArgs {
    /// File or directory to check (defaults to the project root)
    #[arg(value_name = "TARGET")]
    pub target: Option<PathBuf>,

    /// Language whose backend to use
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// Print diagnostics as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(project: &Project, args: DiagnoseArgs) -> Result<()> {
    let language = args
        .language
        .or_else(|| project.config.diagnostics.language.clone())
        .unwrap_or_else(|| "python".to_string());
    let diagnostics =
        DiagnosticsRunner::new(&language, &project.root).run(args.target.as_deref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
        return Ok(());
    }
    if diagnostics.is_empty() {
        println!("No issues found");
        return Ok(());
    }
    for d in &diagnostics {
        let location = match (&d.file, d.line) {
            (Some(file), Some(line)) => format!("{file}:{line}"),
            (Some(file), None) => file.clone(),
            _ => "-".to_string(),
        };
        println!("[{}] {}: {}", d.severity, location, d.message);
    }
    Ok(())
}
