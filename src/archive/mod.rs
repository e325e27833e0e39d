// Archive intake: entry name sanitization and guarded extraction

pub mod guard;
pub mod sanitize;

pub use guard::{ArchiveGuard, Extraction};
pub use sanitize::{sanitize_file_name, MAX_NAME_LENGTH};
