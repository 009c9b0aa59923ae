//! HTTPS implementation of [`ContentStore`] for the GitHub REST API

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};

use super::{ContentStore, PutContentsRequest, StoreError, StoreResponse, StoreResult};
use crate::config::Config;
use crate::logging::*;

pub const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
pub const API_VERSION_HEADER: &str = "x-github-api-version";
pub const API_VERSION: &str = "2022-11-28";

/// One HTTP session against one repository
///
/// The underlying `reqwest::Client` carries the connection pool, the auth and
/// identification headers and the overall request timeout. It is never
/// mutated after construction.
#[derive(Debug, Clone)]
pub struct GithubStore {
	client: Client,
	base: Url,
	owner: String,
	repo: String,
}

impl GithubStore {
	/// Build the session from a validated configuration
	pub fn new(config: &Config) -> Result<Self, StoreError> {
		let mut headers = HeaderMap::new();
		let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
			.map_err(|_| StoreError::Client("token is not a valid header value".to_string()))?;
		auth.set_sensitive(true);
		headers.insert(AUTHORIZATION, auth);
		headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
		headers.insert(
			HeaderName::from_static(API_VERSION_HEADER),
			HeaderValue::from_static(API_VERSION),
		);

		let client = Client::builder()
			.default_headers(headers)
			.user_agent(config.user_agent.clone())
			.timeout(config.request_timeout())
			.build()?;

		Self::with_client(client, &config.api_base, &config.owner, &config.repo)
	}

	/// Use a preconfigured client; headers and timeout are the caller's business
	pub fn with_client(
		client: Client,
		api_base: &str,
		owner: &str,
		repo: &str,
	) -> Result<Self, StoreError> {
		let base = Url::parse(api_base.trim_end_matches('/'))
			.map_err(|e| StoreError::InvalidUrl(format!("{}: {}", api_base, e)))?;
		if base.cannot_be_a_base() {
			return Err(StoreError::InvalidUrl(format!("{} cannot be a base URL", api_base)));
		}
		Ok(Self { client, base, owner: owner.to_string(), repo: repo.to_string() })
	}

	fn url_with(&self, extra: &[&str]) -> Result<Url, StoreError> {
		let mut url = self.base.clone();
		{
			let mut segments = url
				.path_segments_mut()
				.map_err(|_| StoreError::InvalidUrl(self.base.to_string()))?;
			segments.pop_if_empty();
			segments.extend(["repos", self.owner.as_str(), self.repo.as_str()]);
			segments.extend(extra.iter().filter(|s| !s.is_empty()));
		}
		Ok(url)
	}

	/// `{base}/repos/{owner}/{repo}`
	pub fn repository_url(&self) -> Result<Url, StoreError> {
		self.url_with(&[])
	}

	/// `{base}/repos/{owner}/{repo}/contents/{path}`, each path segment percent-encoded
	pub fn contents_url(&self, path: &str) -> Result<Url, StoreError> {
		let mut extra = vec!["contents"];
		extra.extend(path.split('/'));
		self.url_with(&extra)
	}

	async fn into_response(response: reqwest::Response) -> StoreResult<StoreResponse> {
		let status = response.status().as_u16();
		let body = response.text().await?;
		Ok(StoreResponse { status, body })
	}
}

#[async_trait]
impl ContentStore for GithubStore {
	async fn get_contents(&self, path: &str) -> StoreResult<StoreResponse> {
		let url = self.contents_url(path)?;
		debug!("GET {}", url);
		let response = self.client.get(url).send().await?;
		Self::into_response(response).await
	}

	async fn put_contents(
		&self,
		path: &str,
		request: &PutContentsRequest,
	) -> StoreResult<StoreResponse> {
		let url = self.contents_url(path)?;
		debug!("PUT {} (sha: {:?})", url, request.sha);
		let response = self.client.put(url).json(request).send().await?;
		Self::into_response(response).await
	}

	async fn get_repository(&self) -> StoreResult<StoreResponse> {
		let url = self.repository_url()?;
		debug!("GET {}", url);
		let response = self.client.get(url).send().await?;
		Self::into_response(response).await
	}
}


// vim: ts=4
