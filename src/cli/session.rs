//! Session subcommands

use super::utils::Project;
use crate::store::{Session, SessionError, SessionStore};
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum SessionCommand {
    /// List known sessions
    List,

    /// Show a session's metadata summary (defaults to the active session)
    Show {
        #[arg(value_name = "ID")]
        id: Option<String>,
    },

    /// Make a session the active one
    Switch {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Delete a session
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Delete every session
    Purge,
}

pub fn run(project: &Project, command: SessionCommand) -> Result<()> {
    let store = project.sessions()?;
    let result = match command {
        SessionCommand::List => list(&store),
        SessionCommand::Show { id } => show(&store, id.as_deref()),
        SessionCommand::Switch { id } => store.activate_id(&id).map(|session| {
            println!("Active session: {}", session.id);
        }),
        SessionCommand::Delete { id } => store.delete(&id).map(|()| {
            println!("Deleted session {}", id);
        }),
        SessionCommand::Purge => store.purge_all().map(|count| {
            println!("Removed {} session(s)", count);
        }),
    };

    match result {
        Ok(()) => Ok(()),
        Err(err @ (SessionError::NotFound(_) | SessionError::InvalidId(_))) => {
            eprintln!("{}", err);
            Ok(())
        }
        Err(SessionError::Io(err)) => Err(err),
    }
}

fn list(store: &SessionStore) -> Result<(), SessionError> {
    let sessions = store.list()?;
    if sessions.is_empty() {
        println!("No sessions");
        return Ok(());
    }
    let active = store.get_active()?.map(|s| s.id);
    for session in sessions {
        let marker = if active.as_deref() == Some(session.id.as_str()) { "*" } else { " " };
        println!("{} {}", marker, describe(&session));
    }
    Ok(())
}

fn show(store: &SessionStore, id: Option<&str>) -> Result<(), SessionError> {
    let Some(session) = store.resolve(id)? else {
        println!("No active session");
        return Ok(());
    };
    println!("{}", describe(&session));
    match store.load_metadata(&session)? {
        Some(meta) => {
            println!("  Project:          {}", meta.project_name);
            println!("  Primary language: {}", meta.language);
            println!("  Modules:          {}", meta.generated_summary.modules);
            println!("  Functions:        {}", meta.generated_summary.functions);
            println!("  Classes:          {}", meta.generated_summary.classes);
        }
        None => println!("  (not scanned yet)"),
    }
    Ok(())
}

fn describe(session: &Session) -> String {
    let root = session
        .project_root
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    let scanned = session
        .last_scanned
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    format!("{}  {}  (last scanned: {})", session.id, root, scanned)
}
