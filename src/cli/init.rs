//! Init command implementation

use super::utils::Project;
use anyhow::Result;

pub fn run(project: &Project) -> Result<()> {
    let record = project.state.init()?;
    println!("Project initialized!");
    println!("  Project root:    {}", record.project_root.display());
    println!("  Cache directory: {}", project.state.cache_dir().display());
    Ok(())
}
