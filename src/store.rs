//! Host-side graph state: the snapshot on screen and where its next one stands.
//!
//! Requests are ticketed; only the most recent ticket may land, so a slow
//! response can never overwrite a newer one. A failed request leaves the last
//! good snapshot in place.

use log::{debug, error};

use crate::components::knowledge_graph::GraphSnapshot;
use crate::error::FetchError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
	/// Nothing requested yet.
	#[default]
	Idle,
	Loading,
	Ready,
	Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	state: LoadState,
	snapshot: GraphSnapshot,
	issued: u64,
}

impl GraphStore {
	pub fn state(&self) -> &LoadState {
		&self.state
	}

	pub fn is_loading(&self) -> bool {
		self.state == LoadState::Loading
	}

	pub fn error(&self) -> Option<&str> {
		match &self.state {
			LoadState::Failed(message) => Some(message.as_str()),
			_ => None,
		}
	}

	/// Last snapshot that arrived intact, empty before the first one.
	/// Clones share the underlying sequences.
	pub fn snapshot(&self) -> GraphSnapshot {
		self.snapshot.clone()
	}

	/// Starts a request. Any ticket issued earlier is now stale.
	pub fn begin(&mut self) -> Ticket {
		self.issued += 1;
		self.state = LoadState::Loading;
		Ticket(self.issued)
	}

	/// Lands the outcome of `ticket`. Returns `false` when a newer request has
	/// been started since, in which case nothing changes.
	pub fn finish(&mut self, ticket: Ticket, result: Result<GraphSnapshot, FetchError>) -> bool {
		if ticket.0 != self.issued {
			debug!("discarding stale graph response #{}", ticket.0);
			return false;
		}
		match result {
			Ok(snapshot) => {
				self.snapshot = snapshot;
				self.state = LoadState::Ready;
			}
			Err(err) => {
				error!("graph request failed: {}", err);
				self.state = LoadState::Failed(err.to_string());
			}
		}
		true
	}
}
