//! Scan command implementation

use super::utils::Project;
use crate::metadata::{save_context_map, MetadataSummarizer};
use crate::scan::ProjectScanner;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct ScanArgs {
    /// Follow symbolic links when scanning
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Record the session without making it the active one
    #[arg(long)]
    pub no_activate: bool,
}

pub fn run(project: &Project, args: ScanArgs) -> Result<()> {
    let report = ProjectScanner::new(project.root.clone())
        .follow_symlinks(args.follow_symlinks)
        .scan()?;
    save_context_map(&project.state, &report)?;

    let metadata = MetadataSummarizer::new(&project.state).generate(&report)?;

    let store = project.sessions()?;
    let session = if args.no_activate {
        store.get_or_create(&project.root)?
    } else {
        store.set_active(&project.root)?
    };
    store.save_metadata(&session, &metadata)?;

    let totals = &metadata.generated_summary;
    println!("Scan complete!");
    println!("  Project:          {}", metadata.project_name);
    println!("  Primary language: {}", metadata.language);
    println!("  Modules:          {}", totals.modules);
    println!("  Functions:        {}", totals.functions);
    println!("  Classes:          {}", totals.classes);
    if !metadata.entry_points.is_empty() {
        println!("  Entry points:     {}", metadata.entry_points.join(", "));
    }
    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!("  Analysis errors:  {}", failures.len());
        for (path, error) in failures {
            println!("    {}: {}", path, error);
        }
    }
    println!("  Session:          {}", session.id);
    Ok(())
}
