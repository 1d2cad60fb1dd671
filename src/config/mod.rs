//! Configuration loading
//!
//! Handles loading from config files with CLI flags applied on top
//! (CLI > File > Defaults).

pub mod loader;

pub use loader::{load_config, string_or_list};
