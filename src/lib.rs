//! # treepush - Bulk upload of a directory tree to a GitHub repository
//!
//! treepush walks a local directory, drops everything matching the skip
//! patterns and creates or updates every remaining file in a remote
//! repository through the REST contents API, one commit per file. Uploads
//! run strictly in sequence, in batches separated by a cooldown.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use treepush::{push, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = push(Config::from_env(), "./site").await?;
//!     println!("Uploaded {} files", summary.uploaded_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Using the Builder Pattern
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use treepush::{LogProgressObserver, PushBuilder, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = PushBuilder::new(Config::from_env())
//!         .root("./site")
//!         .observer(Arc::new(LogProgressObserver::new()))
//!         .push_tree()
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod callbacks;
pub mod check;
pub mod classify;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod logging;
pub mod progress;
pub mod scan;
pub mod scheduler;
pub mod shutdown;
pub mod store;
pub mod sync;
pub mod types;
pub mod upload;
pub mod validation;

// Re-export commonly used types and functions
pub use aggregate::{ResultAggregator, SyncSummary};
pub use callbacks::{SyncEvent, SyncObserver};
pub use check::{check_connection, ConnectionStatus};
pub use classify::ContentClassifier;
pub use config::Config;
pub use error::{ConfigError, ScanError, SyncError};
pub use exclusion::SkipFilter;
pub use progress::LogProgressObserver;
pub use scan::TreeScanner;
pub use scheduler::{SchedulerState, SyncScheduler};
pub use shutdown::ShutdownFlag;
pub use store::{ContentStore, GithubStore, MemoryStore, StoreError};
pub use sync::{push, PlannedFile, PushBuilder};
pub use types::{FileRecord, RemoteState, UploadOutcome, UploadStatus};
pub use upload::UploadClient;

// vim: ts=4
