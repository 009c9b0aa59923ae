//! Repository connection check

use std::fmt;

use crate::logging::*;
use crate::store::{ContentStore, RepositoryInfo};

/// Result of probing the configured repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
	/// Reachable and readable with the configured token
	Ok(RepositoryInfo),
	RepositoryNotFound,
	AuthenticationFailed,
	/// Any other HTTP answer
	Unexpected { status: u16, body: String },
	/// No HTTP answer at all
	Unreachable(String),
}

impl ConnectionStatus {
	pub fn is_ok(&self) -> bool {
		matches!(self, ConnectionStatus::Ok(_))
	}
}

impl fmt::Display for ConnectionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConnectionStatus::Ok(info) => write!(f, "connected to {}", info.full_name),
			ConnectionStatus::RepositoryNotFound => write!(f, "repository not found"),
			ConnectionStatus::AuthenticationFailed => write!(f, "authentication failed"),
			ConnectionStatus::Unexpected { status, body } => write!(f, "{}: {}", status, body),
			ConnectionStatus::Unreachable(detail) => write!(f, "cannot reach API: {}", detail),
		}
	}
}

/// Fetch repository metadata once and classify the answer
pub async fn check_connection(store: &dyn ContentStore) -> ConnectionStatus {
	let resp = match store.get_repository().await {
		Ok(resp) => resp,
		Err(e) => return ConnectionStatus::Unreachable(e.to_string()),
	};

	match resp.status {
		200 => match serde_json::from_str::<RepositoryInfo>(&resp.body) {
			Ok(info) => ConnectionStatus::Ok(info),
			Err(e) => ConnectionStatus::Unexpected {
				status: 200,
				body: format!("malformed response: {}", e),
			},
		},
		401 => ConnectionStatus::AuthenticationFailed,
		404 => ConnectionStatus::RepositoryNotFound,
		status => ConnectionStatus::Unexpected { status, body: resp.body.trim().to_string() },
	}
}

/// Log the outcome of [`check_connection`]
pub fn log_connection_status(status: &ConnectionStatus) {
	match status {
		ConnectionStatus::Ok(info) => {
			info!("Connected to repository {}", info.full_name);
			if let Some(description) = &info.description {
				info!("Description: {}", description);
			}
			info!("Private: {}", info.private);
			if let Some(url) = &info.html_url {
				info!("URL: {}", url);
			}
		}
		other => error!("Connection check failed: {}", other),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::{MemoryStore, PutContentsRequest, StoreError, StoreResponse, StoreResult};
	use async_trait::async_trait;

	struct Fixed(StoreResult<StoreResponse>);

	#[async_trait]
	impl ContentStore for Fixed {
		async fn get_contents(&self, _path: &str) -> StoreResult<StoreResponse> {
			Ok(StoreResponse::new(404, ""))
		}

		async fn put_contents(
			&self,
			_path: &str,
			_request: &PutContentsRequest,
		) -> StoreResult<StoreResponse> {
			Ok(StoreResponse::new(404, ""))
		}

		async fn get_repository(&self) -> StoreResult<StoreResponse> {
			self.0.clone()
		}
	}

	#[tokio::test]
	async fn test_found_repository() {
		let info = RepositoryInfo {
			full_name: "octocat/hello-world".into(),
			description: Some("demo".into()),
			private: true,
			html_url: Some("https://github.com/octocat/hello-world".into()),
		};
		let store = MemoryStore::with_repository(info.clone());

		let status = check_connection(&store).await;
		assert_eq!(status, ConnectionStatus::Ok(info));
		assert!(status.is_ok());
	}

	#[tokio::test]
	async fn test_status_mapping() {
		assert_eq!(
			check_connection(&MemoryStore::new()).await,
			ConnectionStatus::RepositoryNotFound
		);
		assert_eq!(
			check_connection(&Fixed(Ok(StoreResponse::new(401, "Bad credentials")))).await,
			ConnectionStatus::AuthenticationFailed
		);
		assert_eq!(
			check_connection(&Fixed(Ok(StoreResponse::new(503, "down\n")))).await,
			ConnectionStatus::Unexpected { status: 503, body: "down".into() }
		);
		assert!(matches!(
			check_connection(&Fixed(Ok(StoreResponse::new(200, "[]")))).await,
			ConnectionStatus::Unexpected { status: 200, .. }
		));
	}

	#[tokio::test]
	async fn test_transport_error_is_unreachable() {
		let status = check_connection(&Fixed(Err(StoreError::Timeout))).await;
		assert_eq!(status, ConnectionStatus::Unreachable("Request timed out".into()));
		assert!(!status.is_ok());
	}

	#[test]
	fn test_display() {
		assert_eq!(ConnectionStatus::RepositoryNotFound.to_string(), "repository not found");
		assert_eq!(ConnectionStatus::AuthenticationFailed.to_string(), "authentication failed");
	}
}

// vim: ts=4
