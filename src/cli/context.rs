//! Context, complete and explain commands

use super::utils::{parse_csv, Project};
use crate::context::ContextBuilder;
use crate::domain::ProjectMetadata;
use crate::inference::{cached_request, LlamaCliEngine, Outcome, RequestKind};
use crate::learn::LearnTracker;
use crate::scan::ExclusionFilter;
use crate::store::ContextCache;
use crate::utils::estimate_tokens;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ContextArgs {
    /// File the context is built for
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Stop adding files once this many characters are assembled
    #[arg(short, long, value_name = "CHARS")]
    pub budget: Option<usize>,

    /// Session whose metadata drives ranking (defaults to the active session)
    #[arg(short, long, value_name = "ID")]
    pub session: Option<String>,

    /// Priority folders to search (comma-separated)
    #[arg(long, value_name = "DIRS")]
    pub priority_folders: Option<String>,
}

#[derive(Args)]
pub struct CompleteArgs {
    #[command(flatten)]
    pub context: ContextArgs,
}

#[derive(Args)]
pub struct ExplainArgs {
    /// Code snippet to explain
    #[arg(value_name = "CODE")]
    pub code: String,
}

fn build_context(project: &Project, args: &ContextArgs) -> Result<String> {
    let metadata: ProjectMetadata = project.metadata(args.session.as_deref())?;
    let folders =
        parse_csv(&args.priority_folders).unwrap_or_else(|| project.config.priority_folders.clone());
    let budget = args.budget.unwrap_or(project.config.budget_chars);

    let builder = ContextBuilder::new(&project.root, &metadata)
        .per_file_cap(project.config.per_file_cap)
        .priority_folders(folders)
        .exclusion(ExclusionFilter::load(&project.root)?);
    Ok(builder.build(&args.file, budget))
}

pub fn run_context(project: &Project, args: ContextArgs) -> Result<()> {
    let context = build_context(project, &args)?;
    if context.is_empty() {
        eprintln!("No readable files for {}", args.file.display());
        return Ok(());
    }
    println!("{}", context);
    eprintln!(
        "[context] {} chars (~{} tokens)",
        context.chars().count(),
        estimate_tokens(&context)
    );
    Ok(())
}

pub fn run_complete(project: &Project, args: CompleteArgs) -> Result<()> {
    let context = build_context(project, &args.context)?;
    let cache = ContextCache::open(project.state.cache_dir())?;
    let engine = LlamaCliEngine::new(project.config.model.clone());

    match cached_request(&cache, &engine, RequestKind::Complete, &context)? {
        Outcome::Cached(result) => {
            eprintln!("Using cached result");
            println!("{}", result);
        }
        Outcome::Generated(result) => {
            LearnTracker::open(&project.state.learning_dir())?
                .log_completion(&context, &result, false)?;
            println!("{}", result);
        }
        Outcome::Failed(err) => eprintln!("Error: {}", err),
    }
    Ok(())
}

pub fn run_explain(project: &Project, args: ExplainArgs) -> Result<()> {
    let cache = ContextCache::open(project.state.cache_dir())?;
    let engine = LlamaCliEngine::new(project.config.model.clone());

    match cached_request(&cache, &engine, RequestKind::Explain, &args.code)? {
        Outcome::Cached(result) => {
            eprintln!("Using cached result");
            println!("{}", result);
        }
        Outcome::Generated(result) => println!("{}", result),
        Outcome::Failed(err) => eprintln!("Error: {}", err),
    }
    Ok(())
}
