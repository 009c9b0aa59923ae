//! Remote store error types
//!
//! These cover failures to get any HTTP answer at all. A response with an
//! unexpected status is not an error at this layer; the caller decides what
//! the status means.

use std::fmt;

/// Remote store error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
	/// The HTTP session could not be built (bad header value, TLS setup)
	Client(String),
	/// The request URL could not be formed
	InvalidUrl(String),
	/// Connection, TLS or body transfer failure
	Transport(String),
	/// The session timeout elapsed
	Timeout,
}

impl fmt::Display for StoreError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StoreError::Client(msg) => write!(f, "HTTP client setup failed: {}", msg),
			StoreError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
			StoreError::Transport(msg) => write!(f, "Transport error: {}", msg),
			StoreError::Timeout => write!(f, "Request timed out"),
		}
	}
}

impl std::error::Error for StoreError {}

impl From<reqwest::Error> for StoreError {
	fn from(e: reqwest::Error) -> Self {
		if e.is_timeout() {
			StoreError::Timeout
		} else if e.is_builder() {
			StoreError::Client(e.to_string())
		} else {
			StoreError::Transport(e.to_string())
		}
	}
}

// vim: ts=4
