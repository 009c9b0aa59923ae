//! Core data types shared by the scanner, uploader and scheduler

use serde::Serialize;
use std::fmt;

/// One local file, read once per run
#[derive(Clone, PartialEq, Eq)]
pub struct FileRecord {
	/// Path relative to the upload root, '/'-separated
	pub path: String,
	pub content: Vec<u8>,
	pub is_binary: bool,
}

impl fmt::Debug for FileRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FileRecord")
			.field("path", &self.path)
			.field("size", &self.content.len())
			.field("is_binary", &self.is_binary)
			.finish()
	}
}

/// What the remote store reported for a path just before writing it
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteState {
	/// Object exists; carries its content fingerprint
	Found(String),
	/// Confirmed absent (404)
	Absent,
	/// Lookup failed; treated like `Absent` when writing
	QueryError(String),
}

impl RemoteState {
	/// Fingerprint to send as the expected current value, if any
	pub fn fingerprint(&self) -> Option<&str> {
		match self {
			RemoteState::Found(sha) => Some(sha),
			RemoteState::Absent | RemoteState::QueryError(_) => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadStatus {
	Created,
	Updated,
	Failed,
	SkippedMissing,
}

impl fmt::Display for UploadStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			UploadStatus::Created => write!(f, "created"),
			UploadStatus::Updated => write!(f, "updated"),
			UploadStatus::Failed => write!(f, "failed"),
			UploadStatus::SkippedMissing => write!(f, "skipped-missing"),
		}
	}
}

/// Result of handling one candidate path
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
	pub path: String,
	pub status: UploadStatus,
	pub detail: Option<String>,
}

impl UploadOutcome {
	pub fn created(path: impl Into<String>) -> Self {
		Self { path: path.into(), status: UploadStatus::Created, detail: None }
	}

	pub fn updated(path: impl Into<String>) -> Self {
		Self { path: path.into(), status: UploadStatus::Updated, detail: None }
	}

	pub fn failed(path: impl Into<String>, detail: impl Into<String>) -> Self {
		Self { path: path.into(), status: UploadStatus::Failed, detail: Some(detail.into()) }
	}

	pub fn skipped_missing(path: impl Into<String>, detail: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			status: UploadStatus::SkippedMissing,
			detail: Some(detail.into()),
		}
	}
}


// vim: ts=4
