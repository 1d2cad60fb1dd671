//! lec: budgeted, relevance-ranked code context for local code assistants
//!
//! Scans a project into per-file structural summaries, reduces them into
//! project metadata kept per session, assembles ranked context for a target
//! file under a character budget, and caches generated results by the SHA-256
//! of their exact input.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod domain;
pub mod inference;
pub mod learn;
pub mod metadata;
pub mod scan;
pub mod store;
pub mod utils;
