pub mod archive;
pub mod utils;

pub use archive::{extract, list_entries, ArchiveEntry, ExtractOutcome};
pub use utils::*;
