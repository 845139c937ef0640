//! In-memory snapshot of the remote experiment listing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use expsel_protocol::{Experiment, ListingPath, ListingResponse};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::session::SessionGate;
use crate::{Error, Result};

/// Remote experiment listing service.
#[async_trait(?Send)]
pub trait ExperimentSource {
	/// Fetches the listing at `path`.
	///
	/// Error envelopes are returned as [`ListingResponse::Failure`]; `Err` is
	/// for requests that produced no envelope at all.
	async fn list_experiments(&self, path: &ListingPath) -> Result<ListingResponse>;
}

/// What a finished [`ExperimentCatalog::load`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
	/// The snapshot was replaced with this listing.
	Replaced(Arc<[Experiment]>),
	/// Credentials were rejected; sign-in was re-initiated.
	Unauthorized,
	/// The session changed while the request was in flight.
	Discarded,
}

/// Caches the experiment listing for one profile.
///
/// Loads are not deduplicated: each call issues its own request and applies
/// its own result when it completes, so with overlapping loads the last one
/// to complete wins regardless of issue order.
pub struct ExperimentCatalog {
	source: Arc<dyn ExperimentSource>,
	path: ListingPath,
	snapshot: Mutex<Option<Arc<[Experiment]>>>,
	requests: AtomicU64,
}

impl ExperimentCatalog {
	pub fn new(source: Arc<dyn ExperimentSource>, path: ListingPath) -> Self {
		Self {
			source,
			path,
			snapshot: Mutex::new(None),
			requests: AtomicU64::new(0),
		}
	}

	pub fn path(&self) -> &ListingPath {
		&self.path
	}

	/// Current snapshot; `None` until the first successful load.
	pub fn snapshot(&self) -> Option<Arc<[Experiment]>> {
		self.snapshot.lock().clone()
	}

	pub fn is_loaded(&self) -> bool {
		self.snapshot.lock().is_some()
	}

	pub fn find(&self, id: &str) -> Option<Experiment> {
		self.snapshot
			.lock()
			.as_ref()
			.and_then(|experiments| experiments.iter().find(|e| e.id == id).cloned())
	}

	pub fn clear(&self) {
		*self.snapshot.lock() = None;
	}

	/// Fetches the listing and replaces the snapshot.
	///
	/// A success is applied only while `gate` is signed in and no sign-out
	/// happened since the request was issued. An authorization failure
	/// re-initiates sign-in through `gate`. Other failures leave the snapshot
	/// untouched and are returned.
	pub async fn load(&self, gate: &SessionGate) -> Result<LoadOutcome> {
		let request = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
		let ticket = gate.ticket();
		debug!(request, path = %self.path, "fetching experiment listing");

		let response = self.source.list_experiments(&self.path).await?;

		if !gate.is_same_session(ticket) {
			debug!(request, "discarding listing from an ended session");
			return Ok(LoadOutcome::Discarded);
		}

		let items = match response {
			ListingResponse::Listing { items } => items,
			ListingResponse::Failure { error } if error.is_unauthorized() => {
				warn!(request, code = error.code, message = %error.message, "listing unauthorized");
				gate.ensure_signed_in();
				return Ok(LoadOutcome::Unauthorized);
			}
			ListingResponse::Failure { error } => return Err(Error::from(error)),
		};

		if !gate.is_signed_in() {
			debug!(request, "discarding listing received while signed out");
			return Ok(LoadOutcome::Discarded);
		}

		let experiments: Arc<[Experiment]> = items.into();
		debug!(request, count = experiments.len(), "experiment listing replaced");
		*self.snapshot.lock() = Some(Arc::clone(&experiments));
		Ok(LoadOutcome::Replaced(experiments))
	}
}

impl std::fmt::Debug for ExperimentCatalog {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ExperimentCatalog")
			.field("path", &self.path.to_string())
			.field("loaded", &self.is_loaded())
			.finish()
	}
}
