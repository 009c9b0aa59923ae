//! Remote content store interface
//!
//! The upload protocol depends only on [`ContentStore`], never on a specific
//! backend. [`GithubStore`] talks to the REST contents API over HTTPS and
//! [`MemoryStore`] keeps everything in process for tests and dry runs of the
//! protocol.

use async_trait::async_trait;

pub mod error;
pub mod github;
pub mod memory;
pub mod types;

pub use error::StoreError;
pub use github::GithubStore;
pub use memory::{Injected, MemoryStore, RecordedRequest};
pub use types::{ContentsMetadata, PutContentsRequest, RepositoryInfo, StoreResponse};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Raw access to one repository's contents
///
/// Every method returns the HTTP status and body as received; only failures
/// to get an answer at all are errors. Implementations must be safe to share
/// between sequential calls.
#[async_trait]
pub trait ContentStore: Send + Sync {
	/// `GET /repos/{owner}/{repo}/contents/{path}`
	async fn get_contents(&self, path: &str) -> StoreResult<StoreResponse>;

	/// `PUT /repos/{owner}/{repo}/contents/{path}`
	async fn put_contents(
		&self,
		path: &str,
		request: &PutContentsRequest,
	) -> StoreResult<StoreResponse>;

	/// `GET /repos/{owner}/{repo}`
	async fn get_repository(&self) -> StoreResult<StoreResponse>;
}

// vim: ts=4
