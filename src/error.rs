//! Error types for treepush operations
//!
//! Only errors that abort a whole run live here. Per-file failures never become
//! errors: they are recorded as [`UploadOutcome`](crate::types::UploadOutcome)s.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::store::StoreError;
use crate::validation::ValidationError;

/// Main error type for sync operations
#[derive(Debug)]
pub enum SyncError {
	/// Configuration is missing or invalid; raised before any network call
	Config(ConfigError),

	/// The tree could not be scanned
	Scan(ScanError),

	/// The remote store session could not be set up
	Store(StoreError),

	/// Generic error message
	Other { message: String },
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::Config(e) => write!(f, "Configuration error: {}", e),
			SyncError::Scan(e) => write!(f, "Scan error: {}", e),
			SyncError::Store(e) => write!(f, "Remote store error: {}", e),
			SyncError::Other { message } => write!(f, "{}", message),
		}
	}
}

impl Error for SyncError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			SyncError::Config(e) => Some(e),
			SyncError::Scan(e) => Some(e),
			SyncError::Store(e) => Some(e),
			SyncError::Other { .. } => None,
		}
	}
}

impl From<String> for SyncError {
	fn from(e: String) -> Self {
		SyncError::Other { message: e }
	}
}

impl From<ConfigError> for SyncError {
	fn from(e: ConfigError) -> Self {
		SyncError::Config(e)
	}
}

impl From<ScanError> for SyncError {
	fn from(e: ScanError) -> Self {
		SyncError::Scan(e)
	}
}

impl From<StoreError> for SyncError {
	fn from(e: StoreError) -> Self {
		SyncError::Store(e)
	}
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
	/// A required credential or identifier is absent or blank
	Missing { name: &'static str },

	/// A configured value failed validation
	Invalid(ValidationError),

	/// Config file could not be read
	FileRead { path: PathBuf, source: io::Error },

	/// Config file could not be parsed
	FileParse { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::Missing { name } => write!(f, "missing required setting {}", name),
			ConfigError::Invalid(e) => write!(f, "{}", e),
			ConfigError::FileRead { path, source } => {
				write!(f, "cannot read config file {}: {}", path.display(), source)
			}
			ConfigError::FileParse { path, message } => {
				write!(f, "cannot parse config file {}: {}", path.display(), message)
			}
		}
	}
}

impl Error for ConfigError {}

impl From<ValidationError> for ConfigError {
	fn from(e: ValidationError) -> Self {
		ConfigError::Invalid(e)
	}
}

/// Tree scanning errors
#[derive(Debug)]
pub enum ScanError {
	/// The scan root does not exist or is not a readable directory
	RootUnreadable { path: PathBuf, source: io::Error },

	/// The scan root exists but is not a directory
	NotADirectory { path: PathBuf },
}

impl fmt::Display for ScanError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ScanError::RootUnreadable { path, source } => {
				write!(f, "cannot read {}: {}", path.display(), source)
			}
			ScanError::NotADirectory { path } => {
				write!(f, "{} is not a directory", path.display())
			}
		}
	}
}

impl Error for ScanError {}


// vim: ts=4
