//! lec: AI coding assistant plumbing for modest hardware
//!
//! Builds relevance-ranked, size-bounded context from a codebase and caches
//! model results keyed on the exact content sent.

use anyhow::Result;

fn main() -> Result<()> {
    lec::cli::run()
}
