//! In-process [`ContentStore`] with contents-API semantics
//!
//! Fingerprints are the hex BLAKE3 digest of the stored bytes. Writes follow
//! the remote conflict rules: replacing an object requires its current
//! fingerprint, creating one requires none. Every request is logged so tests
//! can check ordering and counts, and failures can be injected per path.

use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::{
	ContentStore, PutContentsRequest, RepositoryInfo, StoreError, StoreResponse, StoreResult,
};
use crate::classify::{decode_payload, encode_payload};

/// A request as seen by the store, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
	GetContents { path: String },
	PutContents { path: String, sha: Option<String> },
	GetRepository,
}

impl RecordedRequest {
	pub fn path(&self) -> Option<&str> {
		match self {
			RecordedRequest::GetContents { path } | RecordedRequest::PutContents { path, .. } => {
				Some(path)
			}
			RecordedRequest::GetRepository => None,
		}
	}
}

/// Replacement answer for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injected {
	/// Answer with this status and body
	Status(u16, String),
	/// Fail without an answer
	Error(StoreError),
}

/// An object held by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
	pub content: Vec<u8>,
	pub sha: String,
	pub message: String,
	pub branch: String,
}

#[derive(Debug, Default)]
struct MemoryState {
	objects: BTreeMap<String, StoredObject>,
	requests: Vec<RecordedRequest>,
	lookup_faults: HashMap<String, Injected>,
	write_faults: HashMap<String, Injected>,
	repository: Option<RepositoryInfo>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
	state: Mutex<MemoryState>,
}

/// Fingerprint of stored content
pub fn content_fingerprint(content: &[u8]) -> String {
	hex::encode(blake3::hash(content).as_bytes())
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store answering `GET /repos/{owner}/{repo}` with `info`
	pub fn with_repository(info: RepositoryInfo) -> Self {
		let store = Self::new();
		store.lock().repository = Some(info);
		store
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
		self.state.lock().unwrap_or_else(|e| e.into_inner())
	}

	/// Place an object without logging a request; returns its fingerprint
	pub fn seed(&self, path: &str, content: &[u8]) -> String {
		let sha = content_fingerprint(content);
		self.lock().objects.insert(
			path.to_string(),
			StoredObject {
				content: content.to_vec(),
				sha: sha.clone(),
				message: "seed".to_string(),
				branch: "main".to_string(),
			},
		);
		sha
	}

	/// Answer every lookup of `path` with `fault` instead
	pub fn inject_lookup(&self, path: &str, fault: Injected) {
		self.lock().lookup_faults.insert(path.to_string(), fault);
	}

	/// Answer every write of `path` with `fault` instead
	pub fn inject_write(&self, path: &str, fault: Injected) {
		self.lock().write_faults.insert(path.to_string(), fault);
	}

	pub fn object(&self, path: &str) -> Option<StoredObject> {
		self.lock().objects.get(path).cloned()
	}

	pub fn fingerprint(&self, path: &str) -> Option<String> {
		self.lock().objects.get(path).map(|o| o.sha.clone())
	}

	pub fn paths(&self) -> Vec<String> {
		self.lock().objects.keys().cloned().collect()
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.lock().requests.clone()
	}

	pub fn request_count(&self) -> usize {
		self.lock().requests.len()
	}

	fn answer(fault: &Injected) -> StoreResult<StoreResponse> {
		match fault {
			Injected::Status(status, body) => Ok(StoreResponse::new(*status, body.clone())),
			Injected::Error(e) => Err(e.clone()),
		}
	}
}

fn message_body(message: &str) -> String {
	json!({ "message": message }).to_string()
}

#[async_trait]
impl ContentStore for MemoryStore {
	async fn get_contents(&self, path: &str) -> StoreResult<StoreResponse> {
		let mut state = self.lock();
		state.requests.push(RecordedRequest::GetContents { path: path.to_string() });

		if let Some(fault) = state.lookup_faults.get(path) {
			return Self::answer(fault);
		}

		match state.objects.get(path) {
			Some(object) => {
				let body = json!({
					"type": "file",
					"path": path,
					"sha": object.sha,
					"size": object.content.len(),
					"encoding": "base64",
					"content": encode_payload(&object.content, true),
				});
				Ok(StoreResponse::new(200, body.to_string()))
			}
			None => Ok(StoreResponse::new(404, message_body("Not Found"))),
		}
	}

	async fn put_contents(
		&self,
		path: &str,
		request: &PutContentsRequest,
	) -> StoreResult<StoreResponse> {
		let mut state = self.lock();
		let sha = request.sha.clone();
		state.requests.push(RecordedRequest::PutContents { path: path.to_string(), sha });

		if let Some(fault) = state.write_faults.get(path) {
			return Self::answer(fault);
		}

		let content = match decode_payload(&request.content) {
			Ok(c) => c,
			Err(_) => {
				return Ok(StoreResponse::new(422, message_body("content is not valid Base64")))
			}
		};

		let current = state.objects.get(path).map(|o| o.sha.clone());
		let status = match (current.as_deref(), request.sha.as_deref()) {
			(Some(_), None) => {
				return Ok(StoreResponse::new(
					422,
					message_body("Invalid request.\n\n\"sha\" wasn't supplied."),
				))
			}
			(Some(current), Some(expected)) if current != expected => {
				return Ok(StoreResponse::new(
					409,
					message_body(&format!("{} does not match {}", path, expected)),
				))
			}
			(None, Some(expected)) => {
				return Ok(StoreResponse::new(
					409,
					message_body(&format!("{} does not match {}", path, expected)),
				))
			}
			(Some(_), Some(_)) => 200,
			(None, None) => 201,
		};

		let sha = content_fingerprint(&content);
		state.objects.insert(
			path.to_string(),
			StoredObject {
				content,
				sha: sha.clone(),
				message: request.message.clone(),
				branch: request.branch.clone(),
			},
		);
		let body = json!({ "content": { "path": path, "sha": sha } });
		Ok(StoreResponse::new(status, body.to_string()))
	}

	async fn get_repository(&self) -> StoreResult<StoreResponse> {
		let mut state = self.lock();
		state.requests.push(RecordedRequest::GetRepository);
		match &state.repository {
			Some(info) => {
				let body = serde_json::to_string(info).unwrap_or_default();
				Ok(StoreResponse::new(200, body))
			}
			None => Ok(StoreResponse::new(404, message_body("Not Found"))),
		}
	}
}


// vim: ts=4
