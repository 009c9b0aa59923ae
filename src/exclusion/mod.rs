//! Exclusion of paths from the upload
//!
//! [`SkipFilter`] is consulted twice: by the scanner for every directory name,
//! so excluded subtrees are never descended into, and for every relative file
//! path before it becomes a candidate.

mod patterns;

pub use patterns::SkipPattern;

/// Patterns excluded unless the configuration replaces them:
/// VCS metadata, caches, compiled Python, logs, local databases and secrets.
pub const DEFAULT_SKIP_PATTERNS: &[&str] = &[
	".git",
	"__pycache__",
	".cache",
	".pythonlibs",
	".uv",
	"node_modules",
	"*.pyc",
	"*.log",
	"patterns.db",
	"state.json",
	".env",
];

/// Decides whether a path is excluded from sync
#[derive(Debug, Clone)]
pub struct SkipFilter {
	patterns: Vec<SkipPattern>,
}

impl SkipFilter {
	/// Build a filter from pattern strings; empty strings are ignored
	pub fn new<I, S>(patterns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let patterns = patterns
			.into_iter()
			.filter(|p| !p.as_ref().is_empty())
			.map(|p| SkipPattern::new(p.as_ref()))
			.collect();
		Self { patterns }
	}

	/// Filter with [`DEFAULT_SKIP_PATTERNS`]
	pub fn with_defaults() -> Self {
		Self::new(DEFAULT_SKIP_PATTERNS)
	}

	/// Returns true if the relative ('/'-separated) path must not be uploaded
	pub fn should_skip(&self, path: &str) -> bool {
		self.patterns.iter().any(|p| p.matches(path))
	}

	/// Returns true if a directory with this name must not be descended into
	pub fn should_prune_dir(&self, dir_name: &str) -> bool {
		self.patterns.iter().any(|p| p.matches(dir_name))
	}

	pub fn patterns(&self) -> &[SkipPattern] {
		&self.patterns
	}
}

impl Default for SkipFilter {
	fn default() -> Self {
		Self::with_defaults()
	}
}


// vim: ts=4
