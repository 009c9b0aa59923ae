//! Observer trait for run events
//!
//! The scheduler reports every state transition and every per-file result
//! through a [`SyncObserver`]. Closures taking a [`SyncEvent`] are observers
//! too, which keeps tests short.

use crate::scheduler::SchedulerState;
use crate::types::UploadOutcome;

/// Something that happened during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
	/// The scheduler moved to a new state
	StateChanged(SchedulerState),

	/// A batch is about to start (`index` counts from zero)
	BatchStarted { index: usize, total: usize, size: usize },

	/// Upload of one path begins
	FileStarted { path: String },

	/// Upload of one path ended
	FileFinished(UploadOutcome),

	/// Files processed so far, reported at every cooldown and at the end
	Progress { processed: usize, total: usize },
}

/// Receives [`SyncEvent`]s in the order they happen
pub trait SyncObserver: Send + Sync {
	fn on_event(&self, event: SyncEvent);
}

impl<F> SyncObserver for F
where
	F: Fn(SyncEvent) + Send + Sync,
{
	fn on_event(&self, event: SyncEvent) {
		self(event)
	}
}

/// Observer that drops every event
pub struct NoObserver;

impl SyncObserver for NoObserver {
	fn on_event(&self, _event: SyncEvent) {}
}


// vim: ts=4
