//! Configuration validation functions

use super::ValidationError;

/// Validate the number of files uploaded between two cooldowns
pub fn validate_batch_size(batch_size: usize) -> Result<(), ValidationError> {
	if batch_size == 0 {
		return Err(ValidationError::ConfigError("batch size must be greater than 0".to_string()));
	}
	Ok(())
}

/// Validate the per-request timeout in seconds
pub fn validate_timeout_secs(timeout_secs: u64) -> Result<(), ValidationError> {
	if timeout_secs == 0 {
		return Err(ValidationError::ConfigError("Timeout must be greater than 0".to_string()));
	}
	if timeout_secs > 3600 {
		return Err(ValidationError::ConfigError(format!(
			"Timeout too large: {} seconds (max 3600)",
			timeout_secs
		)));
	}
	Ok(())
}

/// Validate the REST API base URL
///
/// Only the scheme is checked here; the HTTP client rejects anything else
/// when the session is built.
pub fn validate_api_base(api_base: &str) -> Result<(), ValidationError> {
	if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
		return Err(ValidationError::ConfigError(format!(
			"API base must be an http(s) URL, got {:?}",
			api_base
		)));
	}
	Ok(())
}

/// Validate an owner or repository name
///
/// Both end up as single URL path segments, so they may not contain '/'.
pub fn validate_identifier(what: &str, value: &str) -> Result<(), ValidationError> {
	if value.contains('/') || value.chars().any(char::is_whitespace) {
		return Err(ValidationError::ConfigError(format!(
			"{} must be a single name without '/' or whitespace, got {:?}",
			what, value
		)));
	}
	Ok(())
}

/// Validate that a commit message template is usable
pub fn validate_message_template(template: &str) -> Result<(), ValidationError> {
	if template.trim().is_empty() {
		return Err(ValidationError::ConfigError("Commit message template is empty".to_string()));
	}
	Ok(())
}
