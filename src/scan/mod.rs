//! Project scanning with ignore-file support

pub mod exclude;
pub mod scanner;
pub mod structure;

pub use exclude::ExclusionFilter;
pub use scanner::{ProjectScanner, ScanReport};
pub use structure::StructureIndex;
