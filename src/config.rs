//! Run configuration for treepush
//!
//! A single immutable [`Config`] is built once at startup and handed to every
//! component that needs it. Nothing below this module reads the environment.
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (`Config::default()`)
//! 2. Config file (TOML, passed with `--config`)
//! 3. Environment variables (`GITHUB_TOKEN`, `GITHUB_REPO_OWNER`, `GITHUB_REPO_NAME`)
//! 4. CLI flags (highest priority)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::classify::DEFAULT_BINARY_EXTENSIONS;
use crate::error::ConfigError;
use crate::exclusion::DEFAULT_SKIP_PATTERNS;
use crate::validation;

/// Environment variable holding the API token
pub const ENV_TOKEN: &str = "GITHUB_TOKEN";

/// Environment variable holding the repository owner
pub const ENV_OWNER: &str = "GITHUB_REPO_OWNER";

/// Environment variable holding the repository name
pub const ENV_REPO: &str = "GITHUB_REPO_NAME";

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_COOLDOWN_MS: u64 = 2000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "Update {path}";

/// Placeholder replaced by the file path in the commit message template
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Client identifier sent as User-Agent
pub fn default_user_agent() -> String {
	format!("treepush/{}", env!("CARGO_PKG_VERSION"))
}

/// Configuration for one upload run
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	/// API token; only ever read from the environment
	#[serde(skip)]
	pub token: String,

	/// Repository owner (user or organization)
	pub owner: String,

	/// Repository name
	pub repo: String,

	/// Target branch for every write
	pub branch: String,

	/// REST API base URL, without trailing slash
	pub api_base: String,

	/// Client identifier sent as User-Agent
	pub user_agent: String,

	/// Commit message for each file, `{path}` is substituted
	pub message_template: String,

	/// Files uploaded between two cooldowns
	pub batch_size: usize,

	/// Pause between batches in milliseconds
	pub cooldown_ms: u64,

	/// Overall timeout for each HTTP request
	pub request_timeout_secs: u64,

	/// Substring-or-suffix patterns excluded from the upload
	pub skip_patterns: Vec<String>,

	/// Extensions (with leading dot) whose content is sent as raw bytes
	pub binary_extensions: Vec<String>,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			token: String::new(),
			owner: String::new(),
			repo: String::new(),
			branch: DEFAULT_BRANCH.to_string(),
			api_base: DEFAULT_API_BASE.to_string(),
			user_agent: default_user_agent(),
			message_template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
			batch_size: DEFAULT_BATCH_SIZE,
			cooldown_ms: DEFAULT_COOLDOWN_MS,
			request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
			skip_patterns: DEFAULT_SKIP_PATTERNS.iter().map(|s| s.to_string()).collect(),
			binary_extensions: DEFAULT_BINARY_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
		}
	}
}

// The token must never end up in logs.
impl fmt::Debug for Config {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Config")
			.field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
			.field("owner", &self.owner)
			.field("repo", &self.repo)
			.field("branch", &self.branch)
			.field("api_base", &self.api_base)
			.field("user_agent", &self.user_agent)
			.field("message_template", &self.message_template)
			.field("batch_size", &self.batch_size)
			.field("cooldown_ms", &self.cooldown_ms)
			.field("request_timeout_secs", &self.request_timeout_secs)
			.field("skip_patterns", &self.skip_patterns)
			.field("binary_extensions", &self.binary_extensions)
			.finish()
	}
}

impl Config {
	/// Defaults overlaid with the process environment
	pub fn from_env() -> Self {
		let mut config = Config::default();
		config.apply_env();
		config
	}

	/// Load a TOML config file on top of the defaults
	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path)
			.map_err(|source| ConfigError::FileRead { path: path.to_path_buf(), source })?;
		Self::from_toml_str(&text)
			.map_err(|message| ConfigError::FileParse { path: path.to_path_buf(), message })
	}

	/// Parse TOML text; missing keys keep their defaults
	pub fn from_toml_str(text: &str) -> Result<Self, String> {
		toml::from_str(text).map_err(|e| e.to_string())
	}

	/// Overlay credentials from the process environment
	pub fn apply_env(&mut self) {
		self.apply_env_with(|name| std::env::var(name).ok());
	}

	/// Overlay credentials from an arbitrary variable lookup
	///
	/// Blank values are ignored so they cannot clear a value set by the file.
	pub fn apply_env_with<F>(&mut self, lookup: F)
	where
		F: Fn(&str) -> Option<String>,
	{
		let non_blank =
			|name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

		if let Some(token) = non_blank(ENV_TOKEN) {
			self.token = token;
		}
		if let Some(owner) = non_blank(ENV_OWNER) {
			self.owner = owner;
		}
		if let Some(repo) = non_blank(ENV_REPO) {
			self.repo = repo;
		}
	}

	/// Check credentials and tunables
	///
	/// Runs before any network activity; a failure here aborts the run.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.validate_credentials()?;
		validation::validate_identifier("owner", &self.owner)?;
		validation::validate_identifier("repository", &self.repo)?;
		if self.branch.trim().is_empty() {
			return Err(ConfigError::Missing { name: "branch" });
		}
		validation::validate_api_base(&self.api_base)?;
		validation::validate_batch_size(self.batch_size)?;
		validation::validate_timeout_secs(self.request_timeout_secs)?;
		validation::validate_message_template(&self.message_template)?;
		Ok(())
	}

	/// Only the three required credentials, in the order they are reported
	pub fn validate_credentials(&self) -> Result<(), ConfigError> {
		if self.token.trim().is_empty() {
			return Err(ConfigError::Missing { name: ENV_TOKEN });
		}
		if self.owner.trim().is_empty() {
			return Err(ConfigError::Missing { name: ENV_OWNER });
		}
		if self.repo.trim().is_empty() {
			return Err(ConfigError::Missing { name: ENV_REPO });
		}
		Ok(())
	}

	pub fn cooldown(&self) -> Duration {
		Duration::from_millis(self.cooldown_ms)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_secs)
	}

	/// Commit message for one file
	pub fn commit_message(&self, path: &str) -> String {
		self.message_template.replace(PATH_PLACEHOLDER, path)
	}

	/// "owner/repo"
	pub fn repository_slug(&self) -> String {
		format!("{}/{}", self.owner, self.repo)
	}

	/// Browser URL of the repository, known only for the public GitHub API
	pub fn web_url(&self) -> Option<String> {
		if self.api_base.trim_end_matches('/') == DEFAULT_API_BASE {
			Some(format!("https://github.com/{}/{}", self.owner, self.repo))
		} else {
			None
		}
	}
}


// vim: ts=4
