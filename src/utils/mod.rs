//! Small shared helpers.

pub mod hashing;
pub mod paths;
pub mod tokens;

pub use hashing::{sha256_hex, short_digest};
pub use paths::{normalize_path, path_has_segment, resolve_path};
pub use tokens::estimate_tokens;
