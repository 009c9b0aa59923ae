//! Binary/text classification and transport encoding
//!
//! Classification looks at the extension only, never at the bytes, so it is
//! fixed before any network call. Text is decoded lossily as UTF-8 and then
//! re-encoded; binary content is passed through untouched. Both end up base64
//! encoded in the request body.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

/// Extensions (lower case, with leading dot) transported as raw bytes
pub const DEFAULT_BINARY_EXTENSIONS: &[&str] = &[
	".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".pdf", ".zip", ".tar", ".gz", ".db",
	".sqlite", ".bin", ".exe", ".dll", ".so",
];

/// Decides how a file's bytes travel to the remote store
#[derive(Debug, Clone)]
pub struct ContentClassifier {
	extensions: Vec<String>,
}

impl ContentClassifier {
	/// Extensions may be given with or without the leading dot, in any case
	pub fn new<I, S>(extensions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let extensions = extensions
			.into_iter()
			.map(|e| {
				let e = e.as_ref().trim().to_lowercase();
				if e.starts_with('.') {
					e
				} else {
					format!(".{}", e)
				}
			})
			.filter(|e| e.len() > 1)
			.collect();
		Self { extensions }
	}

	pub fn with_defaults() -> Self {
		Self::new(DEFAULT_BINARY_EXTENSIONS)
	}

	/// True if the path's extension is on the binary list
	pub fn is_binary(&self, path: &str) -> bool {
		match Path::new(path).extension() {
			Some(ext) => {
				let ext = format!(".{}", ext.to_string_lossy().to_lowercase());
				self.extensions.iter().any(|e| *e == ext)
			}
			None => false,
		}
	}
}

impl Default for ContentClassifier {
	fn default() -> Self {
		Self::with_defaults()
	}
}

/// Bytes that go on the wire for a file, before base64
///
/// Text is decoded with U+FFFD substitution for invalid sequences; valid UTF-8
/// comes back unchanged.
pub fn transport_bytes(content: &[u8], is_binary: bool) -> Vec<u8> {
	if is_binary {
		content.to_vec()
	} else {
		String::from_utf8_lossy(content).into_owned().into_bytes()
	}
}

/// Base64 payload for the `content` field of a write request
pub fn encode_payload(content: &[u8], is_binary: bool) -> String {
	STANDARD.encode(transport_bytes(content, is_binary))
}

/// Inverse of [`encode_payload`]
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
	// The contents API wraps base64 at 60 columns in responses
	let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
	STANDARD.decode(compact)
}


// vim: ts=4
