//! Literal skip patterns
//!
//! A pattern matches when the raw pattern text occurs anywhere in the candidate,
//! or when the candidate ends with the pattern after its `*` characters are
//! removed. `*.log` therefore matches `logs/app.log` by suffix, and `.git`
//! matches `.git`, `.github` and `.gitignore` by containment. A pattern made
//! only of `*` has no suffix and never matches by suffix.

/// One compiled skip pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipPattern {
	/// Original pattern string
	pub pattern: String,

	/// Pattern with wildcard characters stripped, used for suffix matching
	suffix: String,
}

impl SkipPattern {
	pub fn new(pattern: impl Into<String>) -> Self {
		let pattern = pattern.into();
		let suffix = pattern.replace('*', "");
		Self { pattern, suffix }
	}

	/// Check a path or a single path component against this pattern
	pub fn matches(&self, candidate: &str) -> bool {
		candidate.contains(self.pattern.as_str())
			|| (!self.suffix.is_empty() && candidate.ends_with(self.suffix.as_str()))
	}
}
