//! Single-file upload protocol
//!
//! One invocation issues exactly one lookup followed by at most one write for
//! the same path. The fingerprint observed by the lookup travels with the
//! write as the expected current value; the remote store rejects the write if
//! the object changed in between. Nothing here retries, and nothing here
//! returns an error: every failure becomes an [`UploadOutcome`].

use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::classify::{encode_payload, ContentClassifier};
use crate::config::Config;
use crate::logging::*;
use crate::store::{ContentStore, ContentsMetadata, PutContentsRequest, StoreResponse};
use crate::types::{FileRecord, RemoteState, UploadOutcome};

/// Idempotent create-or-update of one file
pub struct UploadClient {
	store: Arc<dyn ContentStore>,
	config: Arc<Config>,
	classifier: ContentClassifier,
}

impl UploadClient {
	pub fn new(store: Arc<dyn ContentStore>, config: Arc<Config>) -> Self {
		let classifier = ContentClassifier::new(&config.binary_extensions);
		Self { store, config, classifier }
	}

	/// Read a candidate from disk and classify it
	pub async fn read_record(&self, root: &Path, path: &str) -> io::Result<FileRecord> {
		let content = tokio::fs::read(root.join(path)).await?;
		Ok(FileRecord {
			path: path.to_string(),
			content,
			is_binary: self.classifier.is_binary(path),
		})
	}

	/// Read and upload one candidate path
	///
	/// A file that vanished or cannot be read since the scan is reported as
	/// skipped without touching the network.
	pub async fn upload_path(&self, root: &Path, path: &str) -> UploadOutcome {
		match self.read_record(root, path).await {
			Ok(record) => self.upload(&record).await,
			Err(e) if e.kind() == io::ErrorKind::NotFound => {
				warn!("File not found: {}", path);
				UploadOutcome::skipped_missing(path, e.to_string())
			}
			Err(e) => {
				warn!("Cannot read {}: {}", path, e);
				UploadOutcome::skipped_missing(path, e.to_string())
			}
		}
	}

	/// Current remote state of `path`
	pub async fn lookup(&self, path: &str) -> RemoteState {
		match self.store.get_contents(path).await {
			Ok(resp) if resp.status == 200 => {
				match serde_json::from_str::<ContentsMetadata>(&resp.body) {
					Ok(meta) if !meta.sha.is_empty() => RemoteState::Found(meta.sha),
					Ok(_) => RemoteState::QueryError("malformed response: empty sha".to_string()),
					Err(e) => RemoteState::QueryError(format!("malformed response: {}", e)),
				}
			}
			Ok(resp) if resp.status == 404 => RemoteState::Absent,
			Ok(resp) => RemoteState::QueryError(format!("{}: {}", resp.status, resp.body.trim())),
			Err(e) => RemoteState::QueryError(e.to_string()),
		}
	}

	/// Look up the remote fingerprint, then create or update
	pub async fn upload(&self, record: &FileRecord) -> UploadOutcome {
		let payload = encode_payload(&record.content, record.is_binary);

		let state = self.lookup(&record.path).await;
		match &state {
			RemoteState::Found(sha) => debug!("{} exists remotely ({})", record.path, sha),
			RemoteState::Absent => debug!("{} is new", record.path),
			RemoteState::QueryError(detail) => warn!(
				"Remote lookup failed for {}: {}; writing without fingerprint",
				record.path, detail
			),
		}

		let request = PutContentsRequest {
			message: self.config.commit_message(&record.path),
			content: payload,
			branch: self.config.branch.clone(),
			sha: state.fingerprint().map(str::to_string),
		};
		let sent_fingerprint = request.sha.is_some();

		let outcome = match self.store.put_contents(&record.path, &request).await {
			Ok(resp) => interpret_write(&record.path, sent_fingerprint, &resp),
			Err(e) => UploadOutcome::failed(&record.path, e.to_string()),
		};

		match &outcome.detail {
			None => info!("Uploaded: {} ({})", outcome.path, outcome.status),
			Some(detail) => error!("Failed to upload {}: {}", outcome.path, detail),
		}
		outcome
	}
}

/// Map a write response to an outcome
///
/// 201 means created. 200 means updated when a fingerprint was sent, created
/// otherwise. Any other status, 2xx included, is a failure.
pub fn interpret_write(path: &str, sent_fingerprint: bool, resp: &StoreResponse) -> UploadOutcome {
	match resp.status {
		201 => UploadOutcome::created(path),
		200 => {
			if sent_fingerprint {
				UploadOutcome::updated(path)
			} else {
				UploadOutcome::created(path)
			}
		}
		status => UploadOutcome::failed(path, format!("{}: {}", status, resp.body.trim())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::{Injected, MemoryStore, RecordedRequest, StoreError};
	use crate::types::UploadStatus;

	fn client(store: &Arc<MemoryStore>) -> UploadClient {
		let config = Config {
			token: "t".into(),
			owner: "o".into(),
			repo: "r".into(),
			message_template: "sync {path}".into(),
			..Default::default()
		};
		UploadClient::new(store.clone(), Arc::new(config))
	}

	fn text(path: &str, body: &str) -> FileRecord {
		FileRecord { path: path.into(), content: body.as_bytes().to_vec(), is_binary: false }
	}

	#[test]
	fn test_interpret_write() {
		let ok = StoreResponse::new(200, "{}");
		assert_eq!(interpret_write("a", true, &ok).status, UploadStatus::Updated);
		assert_eq!(interpret_write("a", false, &ok).status, UploadStatus::Created);
		assert_eq!(
			interpret_write("a", true, &StoreResponse::new(201, "{}")).status,
			UploadStatus::Created
		);

		let conflict =
			interpret_write("a", true, &StoreResponse::new(409, "{\"message\":\"x\"}\n"));
		assert_eq!(conflict.status, UploadStatus::Failed);
		assert_eq!(conflict.detail.as_deref(), Some("409: {\"message\":\"x\"}"));

		let accepted = interpret_write("a", true, &StoreResponse::new(204, ""));
		assert_eq!(accepted.status, UploadStatus::Failed);
		assert_eq!(accepted.detail.as_deref(), Some("204: "));
	}

	#[tokio::test]
	async fn test_lookup_three_way() {
		let store = Arc::new(MemoryStore::new());
		let sha = store.seed("known.txt", b"x");
		store.inject_lookup("broken.txt", Injected::Status(500, "oops".into()));
		store.inject_lookup("garbled.txt", Injected::Status(200, "<html>".into()));
		store.inject_lookup("slow.txt", Injected::Error(StoreError::Timeout));
		let client = client(&store);

		assert_eq!(client.lookup("known.txt").await, RemoteState::Found(sha));
		assert_eq!(client.lookup("new.txt").await, RemoteState::Absent);
		assert_eq!(client.lookup("broken.txt").await, RemoteState::QueryError("500: oops".into()));
		assert!(matches!(
			client.lookup("garbled.txt").await,
			RemoteState::QueryError(d) if d.contains("malformed")
		));
		assert!(matches!(
			client.lookup("slow.txt").await,
			RemoteState::QueryError(d) if d.contains("timed out")
		));
	}

	#[tokio::test]
	async fn test_upload_uses_template_and_branch() {
		let store = Arc::new(MemoryStore::new());
		let outcome = client(&store).upload(&text("app.py", "print(1)\n")).await;

		assert_eq!(outcome, UploadOutcome::created("app.py"));
		let object = store.object("app.py").unwrap();
		assert_eq!(object.message, "sync app.py");
		assert_eq!(object.branch, "main");
		assert_eq!(object.content, b"print(1)\n");
	}

	#[tokio::test]
	async fn test_query_error_still_writes_without_fingerprint() {
		let store = Arc::new(MemoryStore::new());
		store.seed("a.txt", b"old");
		store.inject_lookup("a.txt", Injected::Error(StoreError::Transport("reset".into())));

		let outcome = client(&store).upload(&text("a.txt", "new")).await;

		// The store refuses a create over an existing object
		assert_eq!(outcome.status, UploadStatus::Failed);
		assert!(outcome.detail.unwrap().starts_with("422"));
		assert_eq!(
			store.requests(),
			vec![
				RecordedRequest::GetContents { path: "a.txt".into() },
				RecordedRequest::PutContents { path: "a.txt".into(), sha: None },
			]
		);
	}

	#[tokio::test]
	async fn test_write_transport_error_is_failed_outcome() {
		let store = Arc::new(MemoryStore::new());
		store.inject_write("a.txt", Injected::Error(StoreError::Timeout));

		let outcome = client(&store).upload(&text("a.txt", "x")).await;
		assert_eq!(outcome, UploadOutcome::failed("a.txt", "Request timed out"));
	}

	#[tokio::test]
	async fn test_unexpected_success_status_is_failed() {
		let store = Arc::new(MemoryStore::new());
		store.inject_write("a.txt", Injected::Status(204, String::new()));

		let outcome = client(&store).upload(&text("a.txt", "x")).await;
		assert_eq!(outcome, UploadOutcome::failed("a.txt", "204: "));
	}

	#[tokio::test]
	async fn test_upload_path_missing_file() {
		let dir = tempfile::TempDir::new().unwrap();
		let store = Arc::new(MemoryStore::new());

		let outcome = client(&store).upload_path(dir.path(), "gone.txt").await;
		assert_eq!(outcome.status, UploadStatus::SkippedMissing);
		assert_eq!(store.request_count(), 0);
	}

	#[tokio::test]
	async fn test_read_record_classifies() {
		let dir = tempfile::TempDir::new().unwrap();
		std::fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
		let store = Arc::new(MemoryStore::new());

		let record = client(&store).read_record(dir.path(), "logo.png").await.unwrap();
		assert!(record.is_binary);
		assert_eq!(record.content, vec![0x89, b'P', b'N', b'G']);
	}
}

// vim: ts=4
