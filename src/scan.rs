//! Local tree traversal
//!
//! Produces the candidate paths for one run: every regular file below the
//! root that survives the [`SkipFilter`], relative to the root and joined with
//! '/' on every platform. Entries are visited in file name order within each
//! directory, so two scans of an unchanged tree agree.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::exclusion::SkipFilter;
use crate::logging::*;

/// Walks a directory tree and applies a [`SkipFilter`]
#[derive(Debug, Clone, Default)]
pub struct TreeScanner {
	filter: SkipFilter,
}

impl TreeScanner {
	pub fn new(filter: SkipFilter) -> Self {
		Self { filter }
	}

	/// Collect candidate paths below `root`
	///
	/// Only a missing or unreadable root is an error. Entries that fail below
	/// it are logged and left out. Scanning never writes anything.
	pub fn scan(&self, root: &Path) -> Result<Vec<String>, ScanError> {
		let meta = fs::metadata(root)
			.map_err(|source| ScanError::RootUnreadable { path: root.to_path_buf(), source })?;
		if !meta.is_dir() {
			return Err(ScanError::NotADirectory { path: root.to_path_buf() });
		}

		let walker = WalkDir::new(root)
			.follow_links(false)
			.sort_by_file_name()
			.into_iter()
			.filter_entry(|entry| {
				// Pruned directories are never read
				entry.depth() == 0
					|| !entry.file_type().is_dir()
					|| !self.filter.should_prune_dir(&entry.file_name().to_string_lossy())
			});

		let mut candidates = Vec::new();
		for entry in walker {
			let entry = match entry {
				Ok(e) => e,
				Err(err) if err.depth() == 0 => {
					let source = err
						.into_io_error()
						.unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "walk failed"));
					return Err(ScanError::RootUnreadable { path: root.to_path_buf(), source });
				}
				Err(err) => {
					warn!("Cannot read entry during scan: {}", err);
					continue;
				}
			};

			if entry.depth() == 0 || !is_regular_file(&entry) {
				continue;
			}

			let rel = match relative_path(root, entry.path()) {
				Some(rel) => rel,
				None => {
					warn!("Skipping {}: file name is not valid UTF-8", entry.path().display());
					continue;
				}
			};
			if self.filter.should_skip(&rel) {
				debug!("Skipping {}", rel);
				continue;
			}
			candidates.push(rel);
		}

		debug!("Scan of {} found {} candidates", root.display(), candidates.len());
		Ok(candidates)
	}
}

// Symlinks count when they point at a regular file; directory links are not followed.
fn is_regular_file(entry: &walkdir::DirEntry) -> bool {
	let ft = entry.file_type();
	if ft.is_file() {
		true
	} else if ft.is_symlink() {
		fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false)
	} else {
		false
	}
}

/// Relative, '/'-joined form of `path` below `root`
///
/// `None` when `path` is not below `root` or a component is not valid UTF-8.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
	let rel = path.strip_prefix(root).ok()?;
	let parts = rel.components().map(|c| c.as_os_str().to_str()).collect::<Option<Vec<_>>>()?;
	if parts.is_empty() {
		None
	} else {
		Some(parts.join("/"))
	}
}


// vim: ts=4
