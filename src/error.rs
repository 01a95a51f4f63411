//! Errors surfaced to the hosting page.
//!
//! Layout and rendering never fail: dangling links, empty snapshots and unknown
//! type tags are handled where they occur. Only ingestion and the upstream
//! calls produce errors.

use thiserror::Error;

/// A node or link is missing a field it cannot be addressed without.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
	/// Node at `index` has no identity.
	#[error("node #{index} has no id")]
	MissingNodeId {
		/// Position in the incoming node list.
		index: usize,
	},
	/// Link at `index` lacks its `source` or `target`.
	#[error("link #{index} has no {endpoint}")]
	MissingLinkEndpoint {
		/// Position in the incoming link list.
		index: usize,
		/// `"source"` or `"target"`.
		endpoint: &'static str,
	},
	/// Two nodes share an identity.
	#[error("duplicate node id `{0}`")]
	DuplicateNodeId(String),
}

/// The graph service could not be reached or answered with something unusable.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
	/// The request never produced a response.
	#[error("network error: {0}")]
	Network(String),
	/// The service answered with a non-success status.
	#[error("server returned {status}: {detail}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Server-supplied detail, or the raw body.
		detail: String,
	},
	/// The body was not the expected JSON shape.
	#[error("malformed response: {0}")]
	Malformed(String),
	/// The graph parsed but failed validation.
	#[error(transparent)]
	Invalid(#[from] ValidationError),
}

impl From<serde_json::Error> for FetchError {
	fn from(err: serde_json::Error) -> Self {
		FetchError::Malformed(err.to_string())
	}
}
