//! Path validation functions

use std::path::{Component, Path};

use super::ValidationError;

/// Check if a path is safe (no parent directory references)
///
/// Explicitly listed files must stay inside the upload root, so ".." is refused.
pub fn is_path_safe(path: &Path) -> bool {
	!path.components().any(|c| matches!(c, Component::ParentDir))
}

/// Check if path has no absolute components
pub fn is_path_relative(path: &Path) -> bool {
	!path.has_root()
}

/// Validate a user-supplied candidate path and normalize it to the remote form
///
/// The remote form is relative, '/'-separated and has no "." components.
pub fn normalize_candidate_path(path: &str) -> Result<String, ValidationError> {
	let p = Path::new(path);
	if !is_path_relative(p) {
		return Err(ValidationError::PathError(format!(
			"Path must be relative, got absolute path: {:?}",
			path
		)));
	}
	if !is_path_safe(p) {
		return Err(ValidationError::PathError(format!(
			"Path contains parent directory reference (..): {:?}",
			path
		)));
	}

	let parts: Vec<String> = p
		.components()
		.filter_map(|c| match c {
			Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
			_ => None,
		})
		.collect();
	if parts.is_empty() {
		return Err(ValidationError::PathError(format!("Path names no file: {:?}", path)));
	}
	Ok(parts.join("/"))
}
