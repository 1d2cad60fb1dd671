//! Durable state under the project's `.lec/` directory
//!
//! Two keyed stores live here: the content-addressed result cache and the
//! per-project session store. Neither takes locks; concurrent processes race
//! and the last writer wins.

pub mod cache;
pub mod layout;
pub mod session;

pub use cache::ContextCache;
pub use layout::{write_atomic, InitRecord, StateDir};
pub use session::{Session, SessionError, SessionStore};
