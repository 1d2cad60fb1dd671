//! Learning-log subcommands

use super::utils::Project;
use crate::learn::LearnTracker;
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum LearnCommand {
    /// Record a manual correction of generated code
    Correction {
        #[arg(long)]
        before: String,
        #[arg(long)]
        after: String,
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// Record a test outcome for a file
    Test {
        #[arg(value_name = "FILE")]
        file: String,
        /// Mark the test run as failed
        #[arg(long)]
        failed: bool,
        /// Failure trace
        #[arg(long)]
        trace: Option<String>,
    },
}

pub fn run(project: &Project, command: LearnCommand) -> Result<()> {
    let tracker = LearnTracker::open(&project.state.learning_dir())?;
    match command {
        LearnCommand::Correction { before, after, reason } => {
            tracker.log_correction(&before, &after, &reason)?;
        }
        LearnCommand::Test { file, failed, trace } => {
            tracker.log_test_feedback(&file, !failed, trace.as_deref())?;
        }
    }
    println!("Recorded");
    Ok(())
}
