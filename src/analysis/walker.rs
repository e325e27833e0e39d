// Source discovery: recursive, sorted enumeration of `.java` files

use crate::error::Result;
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never worth descending into
const DEFAULT_EXCLUDES: &[&str] = &[".git", ".svn", "__MACOSX"];

/// Enumerates Java sources under a root.
///
/// Each call to [`SourceWalker::files`] starts a fresh walk. Entries are
/// visited in file-name order so repeated runs see the same sequence.
#[derive(Debug, Clone)]
pub struct SourceWalker {
    root: PathBuf,
    excludes: Vec<Pattern>,
}

impl SourceWalker {
    /// Create a walker; `exclude` holds glob patterns relative to `root`
    pub fn new(root: &Path, exclude: &[String]) -> Result<Self> {
        let excludes = exclude
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            root: root.to_path_buf(),
            excludes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily yield every `.java` file, skipping unreadable entries with a warning
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.is_excluded(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable path: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().map_or(false, |ext| ext == "java"))
            .map(DirEntry::into_path)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }

        if entry.file_type().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                if DEFAULT_EXCLUDES.contains(&name) {
                    return true;
                }
            }
        }

        let relative = entry
            .path()
            .strip_prefix(&self.root)
            .unwrap_or_else(|_| entry.path());
        self.excludes.iter().any(|p| p.matches_path(relative))
    }
}
