//! Wire types of the contents API

use serde::{Deserialize, Serialize};

/// A raw HTTP answer: status code and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreResponse {
	pub status: u16,
	pub body: String,
}

impl StoreResponse {
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutContentsRequest {
	pub message: String,
	/// Base64 encoded file content
	pub content: String,
	pub branch: String,
	/// Fingerprint of the object being replaced; absent when creating
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sha: Option<String>,
}

/// The part of a `GET .../contents/{path}` answer that matters here
#[derive(Debug, Clone, Deserialize)]
pub struct ContentsMetadata {
	pub sha: String,
}

/// Answer of `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
	pub full_name: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub private: bool,
	#[serde(default)]
	pub html_url: Option<String>,
}


// vim: ts=4
