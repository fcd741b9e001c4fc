//! File discovery and reading.
//!
//! The discovery side of the scan is best-effort by contract: entries we
//! cannot stat or read are logged and skipped, never surfaced to the scoring
//! engine. Large files are memory-mapped rather than copied.

use crate::config::ScanConfig;
use crate::error::{Result, StrayError};
use memmap2::Mmap;
use regex::Regex;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Files above this size are memory-mapped instead of read into memory.
const MMAP_THRESHOLD: u64 = 10 * 1024 * 1024;

/// Contents of one candidate file, mapped or owned.
pub enum FileData {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl FileData {
    pub fn as_slice(&self) -> &[u8] {
        match self {
            FileData::Mapped(mmap) => mmap,
            FileData::Owned(vec) => vec,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AsRef<[u8]> for FileData {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Read a candidate file, memory-mapping past the threshold.
pub fn read_file(path: &Path) -> std::io::Result<FileData> {
    let metadata = std::fs::metadata(path)?;
    if metadata.len() > MMAP_THRESHOLD {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        debug!("memory-mapped {} ({} bytes)", path.display(), metadata.len());
        Ok(FileData::Mapped(mmap))
    } else {
        Ok(FileData::Owned(std::fs::read(path)?))
    }
}

/// Walks a directory tree and collects the regular files worth scoring:
/// basename matches the filter and size exceeds the minimum.
pub struct FileLocator {
    filter: Regex,
    min_size: u64,
    follow_symlinks: bool,
}

impl FileLocator {
    pub fn new(filter: Regex, min_size: u64, follow_symlinks: bool) -> Self {
        Self { filter, min_size, follow_symlinks }
    }

    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        Ok(Self::new(config.compile_filter()?, config.min_file_size, config.follow_symlinks))
    }

    /// Collect candidate paths under `root`. Traversal errors are logged and
    /// skipped; a missing or non-directory root is fatal.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(StrayError::path_not_found(root));
        }
        if !root.is_dir() {
            return Err(StrayError::not_a_directory(root));
        }

        let mut candidates = Vec::new();
        for entry in WalkDir::new(root).follow_links(self.follow_symlinks) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("cannot access directory entry: {e}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !self.filter.is_match(&name) {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) if metadata.len() > self.min_size => {
                    candidates.push(entry.into_path());
                }
                Ok(_) => debug!("skipping undersized file: {}", entry.path().display()),
                Err(e) => warn!("cannot stat {}: {e}", entry.path().display()),
            }
        }

        Ok(candidates)
    }
}
