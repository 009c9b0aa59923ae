//! Folding per-file outcomes into run totals

use serde::Serialize;

use crate::logging::*;
use crate::types::{UploadOutcome, UploadStatus};

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
	/// Created plus updated
	pub uploaded_count: usize,
	pub failed_count: usize,
	/// Files that disappeared or became unreadable after the scan
	pub skipped_count: usize,
	pub total_candidates: usize,
	/// Paths that failed, in the order they were processed
	pub failed_paths: Vec<String>,
	/// The run stopped early on a shutdown request
	pub aborted: bool,
}

impl SyncSummary {
	/// A run succeeds when at least one file reached the remote store
	pub fn is_success(&self) -> bool {
		self.uploaded_count > 0
	}

	/// Outcomes recorded so far
	pub fn processed(&self) -> usize {
		self.uploaded_count + self.failed_count + self.skipped_count
	}
}

/// Accumulates [`UploadOutcome`]s into a [`SyncSummary`]
#[derive(Debug, Default)]
pub struct ResultAggregator {
	summary: SyncSummary,
}

impl ResultAggregator {
	pub fn new(total_candidates: usize) -> Self {
		let summary = SyncSummary { total_candidates, ..Default::default() };
		Self { summary }
	}

	pub fn record(&mut self, outcome: UploadOutcome) {
		match outcome.status {
			UploadStatus::Created | UploadStatus::Updated => self.summary.uploaded_count += 1,
			UploadStatus::Failed => {
				self.summary.failed_count += 1;
				self.summary.failed_paths.push(outcome.path);
			}
			UploadStatus::SkippedMissing => {
				let detail = outcome.detail.as_deref().unwrap_or("missing");
				debug!("Skipped {}: {}", outcome.path, detail);
				self.summary.skipped_count += 1;
			}
		}
	}

	pub fn summary(&self) -> &SyncSummary {
		&self.summary
	}

	pub fn finish(mut self, aborted: bool) -> SyncSummary {
		self.summary.aborted = aborted;
		self.summary
	}

	/// Fold a complete sequence of outcomes
	pub fn fold<I>(total_candidates: usize, outcomes: I) -> SyncSummary
	where
		I: IntoIterator<Item = UploadOutcome>,
	{
		let mut aggregator = Self::new(total_candidates);
		for outcome in outcomes {
			aggregator.record(outcome);
		}
		aggregator.finish(false)
	}
}

/// Log the end-of-run report
pub fn log_summary(summary: &SyncSummary) {
	if summary.aborted {
		warn!(
			"Upload interrupted after {}/{} files",
			summary.processed(),
			summary.total_candidates
		);
	} else {
		info!("Upload complete");
	}
	info!("Successfully uploaded: {} files", summary.uploaded_count);
	if summary.skipped_count > 0 {
		info!("Skipped (missing or unreadable): {} files", summary.skipped_count);
	}
	if summary.failed_count > 0 {
		warn!("Failed uploads: {} files", summary.failed_count);
		for path in &summary.failed_paths {
			warn!("  {}", path);
		}
	}
}


// vim: ts=4
