//! Batched, rate-limited upload loop
//!
//! Candidates are uploaded strictly one after another, in the order given,
//! split into batches of `batch_size`. Between two batches the scheduler
//! sleeps for the configured cooldown to stay under the remote rate limit.
//! The loop is an explicit state machine and every transition is reported
//! to the observer:
//!
//! ```text
//! Idle -> Uploading{0} -> Cooldown{0} -> Uploading{1} -> ... -> Done
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::aggregate::{ResultAggregator, SyncSummary};
use crate::callbacks::{NoObserver, SyncEvent, SyncObserver};
use crate::config::Config;
use crate::error::ConfigError;
use crate::logging::*;
use crate::shutdown::ShutdownFlag;
use crate::upload::UploadClient;
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
	Idle,
	/// Uploading the batch with this zero-based index
	Uploading { batch: usize },
	/// Sleeping after the batch with this index
	Cooldown { after_batch: usize },
	Done,
}

impl fmt::Display for SchedulerState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SchedulerState::Idle => write!(f, "idle"),
			SchedulerState::Uploading { batch } => write!(f, "uploading batch {}", batch + 1),
			SchedulerState::Cooldown { after_batch } => {
				write!(f, "cooldown after batch {}", after_batch + 1)
			}
			SchedulerState::Done => write!(f, "done"),
		}
	}
}

/// Split `candidates` into consecutive batches of at most `batch_size`
///
/// The batches are disjoint, cover every candidate and keep the input order.
/// `batch_size` must be non-zero.
pub fn partition(candidates: &[String], batch_size: usize) -> Vec<&[String]> {
	candidates.chunks(batch_size).collect()
}

pub struct SyncScheduler {
	client: UploadClient,
	root: PathBuf,
	batch_size: usize,
	cooldown: Duration,
	observer: Arc<dyn SyncObserver>,
	shutdown: ShutdownFlag,
	state: SchedulerState,
}

impl SyncScheduler {
	/// Scheduler uploading files below `root` with the tunables of `config`
	pub fn new(client: UploadClient, root: &Path, config: &Config) -> Result<Self, ConfigError> {
		validation::validate_batch_size(config.batch_size)?;
		Ok(Self {
			client,
			root: root.to_path_buf(),
			batch_size: config.batch_size,
			cooldown: config.cooldown(),
			observer: Arc::new(NoObserver),
			shutdown: ShutdownFlag::new(),
			state: SchedulerState::Idle,
		})
	}

	pub fn with_observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
		self.observer = observer;
		self
	}

	pub fn with_shutdown(mut self, shutdown: ShutdownFlag) -> Self {
		self.shutdown = shutdown;
		self
	}

	pub fn state(&self) -> SchedulerState {
		self.state
	}

	fn transition(&mut self, next: SchedulerState) {
		debug!("Scheduler: {} -> {}", self.state, next);
		self.state = next;
		self.observer.on_event(SyncEvent::StateChanged(next));
	}

	/// Upload every candidate and fold the outcomes
	///
	/// Never fails: per-file problems end up in the summary. A shutdown
	/// request stops the loop before the next file or cooldown and marks the
	/// summary as aborted.
	pub async fn run(&mut self, candidates: &[String]) -> SyncSummary {
		let total = candidates.len();
		let batches = partition(candidates, self.batch_size);
		let mut aggregator = ResultAggregator::new(total);
		let mut aborted = false;

		info!("Uploading {} files in {} batches", total, batches.len());

		'batches: for (index, batch) in batches.iter().enumerate() {
			self.transition(SchedulerState::Uploading { batch: index });
			self.observer.on_event(SyncEvent::BatchStarted {
				index,
				total: batches.len(),
				size: batch.len(),
			});

			for path in batch.iter() {
				if self.shutdown.is_triggered() {
					aborted = true;
					break 'batches;
				}
				self.observer.on_event(SyncEvent::FileStarted { path: path.clone() });
				let outcome = self.client.upload_path(&self.root, path).await;
				self.observer.on_event(SyncEvent::FileFinished(outcome.clone()));
				aggregator.record(outcome);
			}

			if index + 1 == batches.len() {
				break;
			}
			if self.shutdown.is_triggered() {
				aborted = true;
				break;
			}

			self.transition(SchedulerState::Cooldown { after_batch: index });
			self.observer.on_event(SyncEvent::Progress {
				processed: aggregator.summary().processed(),
				total,
			});
			debug!("Waiting {:?} before the next batch", self.cooldown);
			let interrupted = tokio::select! {
				_ = tokio::time::sleep(self.cooldown) => false,
				_ = self.shutdown.triggered() => true,
			};
			if interrupted {
				aborted = true;
				break;
			}
		}

		let summary = aggregator.finish(aborted);
		self.observer
			.on_event(SyncEvent::Progress { processed: summary.processed(), total });
		self.transition(SchedulerState::Done);
		summary
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::MemoryStore;
	use std::sync::Mutex;

	fn names(n: usize) -> Vec<String> {
		(0..n).map(|i| format!("f{:02}.txt", i)).collect()
	}

	fn config(batch_size: usize) -> Config {
		Config {
			token: "t".into(),
			owner: "o".into(),
			repo: "r".into(),
			batch_size,
			cooldown_ms: 2000,
			..Default::default()
		}
	}

	fn recorder() -> (Arc<Mutex<Vec<SyncEvent>>>, Arc<dyn SyncObserver>) {
		let events = Arc::new(Mutex::new(Vec::new()));
		let sink = events.clone();
		let observer = move |event: SyncEvent| sink.lock().unwrap().push(event);
		(events, Arc::new(observer))
	}

	#[test]
	fn test_partition_sizes() {
		let candidates = names(25);
		let sizes: Vec<usize> = partition(&candidates, 10).iter().map(|b| b.len()).collect();
		assert_eq!(sizes, vec![10, 10, 5]);

		assert!(partition(&[], 10).is_empty());
		assert_eq!(partition(&candidates, 100).len(), 1);
	}

	#[test]
	fn test_partition_is_exhaustive_and_ordered() {
		let candidates = names(23);
		for size in 1..=24 {
			let flat: Vec<String> = partition(&candidates, size).concat();
			assert_eq!(flat, candidates, "batch size {}", size);
		}
	}

	#[test]
	fn test_zero_batch_size_is_rejected() {
		let config = config(0);
		let client = UploadClient::new(Arc::new(MemoryStore::new()), Arc::new(config.clone()));
		assert!(matches!(
			SyncScheduler::new(client, Path::new("."), &config),
			Err(ConfigError::Invalid(_))
		));
	}

	#[tokio::test(start_paused = true)]
	async fn test_batches_and_cooldowns() {
		let dir = tempfile::TempDir::new().unwrap();
		let candidates = names(25);
		for name in &candidates {
			std::fs::write(dir.path().join(name), name).unwrap();
		}

		let config = config(10);
		let store = Arc::new(MemoryStore::new());
		let client = UploadClient::new(store.clone(), Arc::new(config.clone()));
		let (events, observer) = recorder();
		let mut scheduler =
			SyncScheduler::new(client, dir.path(), &config).unwrap().with_observer(observer);

		let started = tokio::time::Instant::now();
		let summary = scheduler.run(&candidates).await;

		assert_eq!(summary.uploaded_count, 25);
		assert!(!summary.aborted);
		assert_eq!(scheduler.state(), SchedulerState::Done);
		assert!(started.elapsed() >= Duration::from_millis(4000));

		let events = events.lock().unwrap();
		let states: Vec<SchedulerState> = events
			.iter()
			.filter_map(|e| match e {
				SyncEvent::StateChanged(s) => Some(*s),
				_ => None,
			})
			.collect();
		assert_eq!(
			states,
			vec![
				SchedulerState::Uploading { batch: 0 },
				SchedulerState::Cooldown { after_batch: 0 },
				SchedulerState::Uploading { batch: 1 },
				SchedulerState::Cooldown { after_batch: 1 },
				SchedulerState::Uploading { batch: 2 },
				SchedulerState::Done,
			]
		);

		let sizes: Vec<usize> = events
			.iter()
			.filter_map(|e| match e {
				SyncEvent::BatchStarted { size, .. } => Some(*size),
				_ => None,
			})
			.collect();
		assert_eq!(sizes, vec![10, 10, 5]);

		let progress: Vec<usize> = events
			.iter()
			.filter_map(|e| match e {
				SyncEvent::Progress { processed, .. } => Some(*processed),
				_ => None,
			})
			.collect();
		assert_eq!(progress, vec![10, 20, 25]);
	}

	#[tokio::test]
	async fn test_shutdown_before_start_uploads_nothing() {
		let dir = tempfile::TempDir::new().unwrap();
		let config = config(10);
		let store = Arc::new(MemoryStore::new());
		let client = UploadClient::new(store.clone(), Arc::new(config.clone()));
		let shutdown = ShutdownFlag::new();
		shutdown.trigger();

		let mut scheduler =
			SyncScheduler::new(client, dir.path(), &config).unwrap().with_shutdown(shutdown);
		let summary = scheduler.run(&names(3)).await;

		assert!(summary.aborted);
		assert_eq!(summary.processed(), 0);
		assert_eq!(summary.total_candidates, 3);
		assert_eq!(store.request_count(), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn test_shutdown_during_cooldown_keeps_outcomes() {
		let dir = tempfile::TempDir::new().unwrap();
		let candidates = names(4);
		for name in &candidates {
			std::fs::write(dir.path().join(name), name).unwrap();
		}
		let config = Config { cooldown_ms: 60_000, ..config(2) };
		let store = Arc::new(MemoryStore::new());
		let client = UploadClient::new(store.clone(), Arc::new(config.clone()));
		let shutdown = ShutdownFlag::new();

		let trigger = shutdown.clone();
		let observer = move |event: SyncEvent| {
			if let SyncEvent::StateChanged(SchedulerState::Cooldown { .. }) = event {
				trigger.trigger();
			}
		};
		let mut scheduler = SyncScheduler::new(client, dir.path(), &config)
			.unwrap()
			.with_observer(Arc::new(observer))
			.with_shutdown(shutdown);

		let started = tokio::time::Instant::now();
		let summary = scheduler.run(&candidates).await;

		assert!(summary.aborted);
		assert_eq!(summary.uploaded_count, 2);
		assert_eq!(store.paths(), vec!["f00.txt".to_string(), "f01.txt".to_string()]);
		assert!(started.elapsed() < Duration::from_millis(60_000));
	}

	#[tokio::test]
	async fn test_missing_file_is_skipped_and_run_continues() {
		let dir = tempfile::TempDir::new().unwrap();
		std::fs::write(dir.path().join("b.txt"), "b").unwrap();
		let config = config(10);
		let store = Arc::new(MemoryStore::new());
		let client = UploadClient::new(store.clone(), Arc::new(config.clone()));

		let mut scheduler = SyncScheduler::new(client, dir.path(), &config).unwrap();
		let summary = scheduler.run(&["a.txt".to_string(), "b.txt".to_string()]).await;

		assert_eq!(summary.skipped_count, 1);
		assert_eq!(summary.uploaded_count, 1);
		assert!(summary.is_success());
	}
}

// vim: ts=4
