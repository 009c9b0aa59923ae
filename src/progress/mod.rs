//! Progress reporting for CLI runs
//!
//! [`LogProgressObserver`] turns scheduler events into log lines: one line
//! per batch, one progress line at every cooldown and at the end of the run.

pub mod constants;

use std::sync::Mutex;
use std::time::Instant;

use crate::callbacks::{SyncEvent, SyncObserver};
use crate::logging::*;
use crate::scheduler::SchedulerState;
use crate::types::UploadStatus;

/// Progress display constants
pub use constants::*;

/// Render `[=====     ]` for `processed` out of `total`
pub fn progress_bar(processed: usize, total: usize) -> String {
	let ratio = if total > 0 { processed as f64 / total as f64 } else { 1.0 };
	let filled = (ratio.clamp(0.0, 1.0) * PROGRESS_BAR_WIDTH as f64) as usize;
	format!("[{}{}]", "=".repeat(filled), " ".repeat(PROGRESS_BAR_WIDTH - filled))
}

/// Logs run progress through `tracing`
pub struct LogProgressObserver {
	started: Mutex<Option<Instant>>,
}

impl LogProgressObserver {
	pub fn new() -> Self {
		Self { started: Mutex::new(None) }
	}
}

impl Default for LogProgressObserver {
	fn default() -> Self {
		Self::new()
	}
}

impl SyncObserver for LogProgressObserver {
	fn on_event(&self, event: SyncEvent) {
		match event {
			SyncEvent::StateChanged(state) => {
				let mut started = self.started.lock().unwrap_or_else(|e| e.into_inner());
				match state {
					SchedulerState::Uploading { .. } if started.is_none() => {
						*started = Some(Instant::now());
					}
					SchedulerState::Cooldown { .. } => debug!("Cooling down..."),
					SchedulerState::Done => {
						if let Some(at) = started.take() {
							debug!("Run finished in {:.1}s", at.elapsed().as_secs_f64());
						}
					}
					_ => {}
				}
			}
			SyncEvent::BatchStarted { index, total, size } => {
				info!("Batch {}/{} ({} files)", index + 1, total, size);
			}
			SyncEvent::FileStarted { path } => debug!("Uploading {}", path),
			SyncEvent::FileFinished(outcome) => {
				if outcome.status == UploadStatus::SkippedMissing {
					debug!("Skipped {}", outcome.path);
				}
			}
			SyncEvent::Progress { processed, total } => {
				let bar = progress_bar(processed, total);
				info!("{} Processed {}/{} files...", bar, processed, total);
			}
		}
	}
}


// vim: ts=4
