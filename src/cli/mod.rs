//! Command-line interface for lec
//!
//! Subcommands cover project initialization, scanning, context assembly,
//! cached completion/explanation, session management and diagnostics.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod context;
mod diagnose;
mod init;
mod learn;
mod scan;
mod session;
mod utils;

/// Budgeted code context and cached completions for modest hardware
#[derive(Parser)]
#[command(name = "lec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root holding the `.lec` state directory
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Explicit config file (TOML or YAML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the .lec state directory
    Init,

    /// Scan the project and record its metadata in a session
    Scan(scan::ScanArgs),

    /// Print the context assembled for a file
    Context(context::ContextArgs),

    /// Complete code using the context assembled for a file
    Complete(context::CompleteArgs),

    /// Explain a code snippet
    Explain(context::ExplainArgs),

    /// Manage project sessions
    #[command(subcommand)]
    Session(session::SessionCommand),

    /// Run static diagnostics
    Diagnose(diagnose::DiagnoseArgs),

    /// Record feedback in the learning log
    #[command(subcommand)]
    Learn(learn::LearnCommand),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    crate::domain::check_language_table()?;

    let project = utils::Project::load(&cli.root, cli.config.as_deref())?;
    match cli.command {
        Commands::Init => init::run(&project),
        Commands::Scan(args) => scan::run(&project, args),
        Commands::Context(args) => context::run_context(&project, args),
        Commands::Complete(args) => context::run_complete(&project, args),
        Commands::Explain(args) => context::run_explain(&project, args),
        Commands::Session(command) => session::run(&project, command),
        Commands::Diagnose(args) => diagnose::run(&project, args),
        Commands::Learn(command) => learn::run(&project, command),
    }
}
