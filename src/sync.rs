//! Run orchestration: configuration check, candidate selection, upload
//!
//! [`PushBuilder`] wires a [`Config`] to a content store, a scanner and a
//! scheduler. Configuration is validated before anything else happens, so a
//! bad setup never reaches the network.

use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::aggregate::{log_summary, SyncSummary};
use crate::callbacks::{NoObserver, SyncObserver};
use crate::classify::ContentClassifier;
use crate::config::Config;
use crate::error::SyncError;
use crate::exclusion::SkipFilter;
use crate::logging::*;
use crate::scan::TreeScanner;
use crate::scheduler::SyncScheduler;
use crate::shutdown::ShutdownFlag;
use crate::store::{ContentStore, GithubStore};
use crate::upload::UploadClient;
use crate::validation::normalize_candidate_path;

/// One file a dry run would upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
	pub path: String,
	pub is_binary: bool,
}

/// Builder for a single upload run
pub struct PushBuilder {
	config: Config,
	root: PathBuf,
	store: Option<Arc<dyn ContentStore>>,
	observer: Arc<dyn SyncObserver>,
	shutdown: ShutdownFlag,
}

impl PushBuilder {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			root: PathBuf::from("."),
			store: None,
			observer: Arc::new(NoObserver),
			shutdown: ShutdownFlag::new(),
		}
	}

	/// Local directory the candidate paths are relative to (default: `.`)
	pub fn root(mut self, root: impl AsRef<Path>) -> Self {
		self.root = root.as_ref().to_path_buf();
		self
	}

	/// Use this store instead of opening an HTTPS session
	pub fn store(mut self, store: Arc<dyn ContentStore>) -> Self {
		self.store = Some(store);
		self
	}

	pub fn observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
		self.observer = observer;
		self
	}

	pub fn shutdown(mut self, shutdown: ShutdownFlag) -> Self {
		self.shutdown = shutdown;
		self
	}

	fn skip_filter(&self) -> SkipFilter {
		SkipFilter::new(&self.config.skip_patterns)
	}

	/// Scan the root and list what would be uploaded; needs no credentials
	pub fn plan_tree(&self) -> Result<Vec<PlannedFile>, SyncError> {
		let classifier = ContentClassifier::new(&self.config.binary_extensions);
		let candidates = TreeScanner::new(self.skip_filter()).scan(&self.root)?;
		Ok(candidates
			.into_iter()
			.map(|path| PlannedFile { is_binary: classifier.is_binary(&path), path })
			.collect())
	}

	/// Upload every non-skipped file below the root
	pub async fn push_tree(self) -> Result<SyncSummary, SyncError> {
		self.config.validate()?;

		info!("Scanning {}", self.root.display());
		let candidates = TreeScanner::new(self.skip_filter()).scan(&self.root)?;
		info!("Found {} files to upload", candidates.len());

		self.run(candidates).await
	}

	/// Upload an explicit list of paths relative to the root
	///
	/// Paths matching a skip pattern are dropped, as are paths escaping the
	/// root. Listed files that do not exist end up as skipped outcomes.
	pub async fn push_files<I, S>(self, files: I) -> Result<SyncSummary, SyncError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.config.validate()?;

		let candidates = self.select_files(files);
		info!("Uploading {} listed files", candidates.len());

		self.run(candidates).await
	}

	fn select_files<I, S>(&self, files: I) -> Vec<String>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let filter = self.skip_filter();
		let mut seen = HashSet::new();
		let mut candidates = Vec::new();

		for file in files {
			let path = match normalize_candidate_path(file.as_ref()) {
				Ok(path) => path,
				Err(e) => {
					warn!("Ignoring {}: {}", file.as_ref(), e);
					continue;
				}
			};
			if filter.should_skip(&path) {
				info!("Skipping {}", path);
				continue;
			}
			if seen.insert(path.clone()) {
				candidates.push(path);
			}
		}
		candidates
	}

	fn connect(&self) -> Result<Arc<dyn ContentStore>, SyncError> {
		match &self.store {
			Some(store) => Ok(store.clone()),
			None => Ok(Arc::new(GithubStore::new(&self.config)?)),
		}
	}

	async fn run(self, candidates: Vec<String>) -> Result<SyncSummary, SyncError> {
		let store = self.connect()?;
		let config = Arc::new(self.config);
		let client = UploadClient::new(store, config.clone());

		let mut scheduler = SyncScheduler::new(client, &self.root, &config)?
			.with_observer(self.observer)
			.with_shutdown(self.shutdown);
		let summary = scheduler.run(&candidates).await;

		log_summary(&summary);
		if let Some(url) = config.web_url() {
			info!("Repository: {}", url);
		}
		Ok(summary)
	}
}

/// Upload the tree below `root` with default settings for everything else
pub async fn push(config: Config, root: impl AsRef<Path>) -> Result<SyncSummary, SyncError> {
	PushBuilder::new(config).root(root).push_tree().await
}


// vim: ts=4
