//! Cooperative cancellation on SIGINT/SIGTERM
//!
//! The first signal only raises a [`ShutdownFlag`]; the scheduler checks it
//! before every file and every cooldown and stops with what it has. A second
//! signal exits the process immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logging::*;

#[derive(Debug, Default)]
struct Inner {
	triggered: AtomicBool,
	notify: Notify,
}

/// Shared "stop after the current file" flag
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
	inner: Arc<Inner>,
}

impl ShutdownFlag {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn trigger(&self) {
		self.inner.triggered.store(true, Ordering::SeqCst);
		self.inner.notify.notify_waiters();
	}

	pub fn is_triggered(&self) -> bool {
		self.inner.triggered.load(Ordering::SeqCst)
	}

	/// Resolves once [`trigger`](Self::trigger) has been called
	pub async fn triggered(&self) {
		loop {
			let notified = self.inner.notify.notified();
			if self.is_triggered() {
				return;
			}
			notified.await;
		}
	}
}

/// Spawn a task raising `flag` on the first termination signal
///
/// Must be called from within a tokio runtime.
pub fn install_signal_handlers(flag: ShutdownFlag) {
	tokio::spawn(async move {
		if let Err(e) = wait_for_signal().await {
			warn!("Failed to set up signal handlers: {}. Interrupts will not stop gracefully.", e);
			return;
		}
		warn!("Interrupt received, stopping after the current file...");
		flag.trigger();

		if wait_for_signal().await.is_ok() {
			debug!("Second interrupt received, exiting");
			std::process::exit(130); // 128 + SIGINT(2)
		}
	});
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
	use tokio::signal::unix::{signal, SignalKind};

	let mut sigterm = signal(SignalKind::terminate())?;
	let mut sigint = signal(SignalKind::interrupt())?;
	tokio::select! {
		_ = sigterm.recv() => debug!("Received SIGTERM"),
		_ = sigint.recv() => debug!("Received SIGINT"),
	}
	Ok(())
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
	tokio::signal::ctrl_c().await
}


// vim: ts=4
