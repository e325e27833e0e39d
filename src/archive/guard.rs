// Safe extraction of untrusted zip archives

use crate::archive::sanitize::sanitize_file_name;
use crate::config::ArchiveConfig;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Outcome of a completed extraction
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Canonical path of the extraction root
    pub root: PathBuf,
    pub files: usize,
    pub directories: usize,
    /// Bytes written to disk
    pub bytes: u64,
    /// Raw names of entries that were dropped
    pub skipped: Vec<String>,
}

/// Extracts archives while enforcing size, ratio and containment limits
pub struct ArchiveGuard {
    limits: ArchiveConfig,
}

impl ArchiveGuard {
    pub fn new(limits: ArchiveConfig) -> Self {
        Self { limits }
    }

    /// Extract `archive` into `dest`.
    ///
    /// Entries that would land outside `dest` or carry unsafe names are logged
    /// and skipped. Exceeding a size limit or the compression ratio aborts the
    /// extraction; bytes already written stay on disk.
    pub fn extract(&self, archive: &Path, dest: &Path) -> Result<Extraction> {
        if archive.as_os_str().is_empty() || dest.as_os_str().is_empty() {
            return Err(Error::invalid_input("archive and destination are required"));
        }

        let metadata = fs::metadata(archive).map_err(|e| {
            Error::invalid_input(format!("cannot read archive {}: {}", archive.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(Error::invalid_input(format!(
                "{} is not a file",
                archive.display()
            )));
        }
        if metadata.len() == 0 {
            return Err(Error::invalid_input(format!(
                "{} is empty",
                archive.display()
            )));
        }
        if metadata.len() > self.limits.max_total_bytes {
            return Err(Error::size_limit(
                archive.display().to_string(),
                self.limits.max_total_bytes,
                metadata.len(),
            ));
        }

        fs::create_dir_all(dest)?;
        let root = dest.canonicalize()?;

        let mut zip = ZipArchive::new(File::open(archive)?)?;
        let mut extraction = Extraction {
            root: root.clone(),
            files: 0,
            directories: 0,
            bytes: 0,
            skipped: Vec::new(),
        };
        let mut declared_total: u64 = 0;

        for index in 0..zip.len() {
            let mut entry = zip.by_index(index)?;
            let raw_name = entry.name().to_string();

            let relative = match safe_relative_path(&raw_name) {
                Ok(relative) => relative,
                Err(e @ Error::PathTraversal(_)) => {
                    tracing::warn!("Skipping entry: {}", e);
                    extraction.skipped.push(raw_name);
                    continue;
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("Skipping entry {:?}: {}", raw_name, e);
                    extraction.skipped.push(raw_name);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let Some(target) = contained_path(&root, &relative) else {
                tracing::warn!("Skipping entry: {}", Error::PathTraversal(raw_name.clone()));
                extraction.skipped.push(raw_name);
                continue;
            };

            if entry.is_dir() {
                fs::create_dir_all(&target)?;
                extraction.directories += 1;
                continue;
            }

            let declared = entry.size();
            if declared > self.limits.max_entry_bytes {
                return Err(Error::size_limit(
                    raw_name,
                    self.limits.max_entry_bytes,
                    declared,
                ));
            }
            declared_total = declared_total.saturating_add(declared);
            if declared_total > self.limits.max_total_bytes {
                return Err(Error::size_limit(
                    "archive contents",
                    self.limits.max_total_bytes,
                    declared_total,
                ));
            }
            self.check_ratio(&raw_name, declared, entry.compressed_size())?;

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }

            let written = {
                let mut out = File::create(&target)?;
                let mut limited = (&mut entry).take(self.limits.max_entry_bytes + 1);
                io::copy(&mut limited, &mut out)?
            };
            if written > self.limits.max_entry_bytes {
                return Err(Error::size_limit(
                    raw_name,
                    self.limits.max_entry_bytes,
                    written,
                ));
            }

            extraction.bytes += written;
            if extraction.bytes > self.limits.max_total_bytes {
                return Err(Error::size_limit(
                    "archive contents",
                    self.limits.max_total_bytes,
                    extraction.bytes,
                ));
            }

            extraction.files += 1;
            tracing::debug!("Extracted {} ({} bytes)", target.display(), written);
        }

        tracing::info!(
            "Extracted {} files ({} bytes) into {}, skipped {} entries",
            extraction.files,
            extraction.bytes,
            root.display(),
            extraction.skipped.len()
        );

        Ok(extraction)
    }

    fn check_ratio(&self, entry: &str, size: u64, compressed: u64) -> Result<()> {
        let limit = self.limits.max_compression_ratio;
        if limit <= 0.0 || compressed == 0 {
            return Ok(());
        }

        let ratio = size as f64 / compressed as f64;
        if ratio > limit {
            return Err(Error::SuspiciousCompression {
                entry: entry.to_string(),
                ratio,
            });
        }
        Ok(())
    }
}

/// Split a raw entry name into sanitized components.
///
/// Absolute names and `..` components are traversal attempts.
fn safe_relative_path(raw: &str) -> Result<PathBuf> {
    let normalized = raw.replace('\\', "/");
    if normalized.starts_with('/') {
        return Err(Error::PathTraversal(raw.to_string()));
    }

    let mut relative = PathBuf::new();
    for part in normalized.split('/') {
        match part {
            "" | "." => continue,
            ".." => return Err(Error::PathTraversal(raw.to_string())),
            _ => relative.push(sanitize_file_name(part)?),
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(Error::unsafe_name(raw, "empty entry name"));
    }

    Ok(relative)
}

/// Join `relative` onto `root`, resolving any existing prefix (including
/// symlinks) and requiring the result to stay strictly below `root`
fn contained_path(root: &Path, relative: &Path) -> Option<PathBuf> {
    let mut current = root.to_path_buf();
    for component in relative.components() {
        current.push(component);
        if current.symlink_metadata().is_ok() {
            current = current.canonicalize().ok()?;
            if !current.starts_with(root) {
                return None;
            }
        }
    }

    (current != root && current.starts_with(root)).then_some(current)
}
