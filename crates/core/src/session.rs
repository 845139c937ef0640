//! Authentication gate in front of every catalog fetch.

use std::sync::Arc;

use async_trait::async_trait;
use expsel_protocol::WidgetConfig;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Result;
use crate::catalog::ExperimentCatalog;

/// Browser-side authentication provider.
///
/// `sign_in` and `sign_out` only start the interaction; the resulting status
/// arrives later through [`ExperimentSelector::on_status_change`], which the
/// embedder wires to the provider's status listener.
///
/// [`ExperimentSelector::on_status_change`]: crate::ExperimentSelector::on_status_change
#[async_trait(?Send)]
pub trait AuthProvider {
	/// Loads and configures the provider (client id, scope, discovery doc).
	async fn initialize(&self, config: &WidgetConfig) -> Result<()>;

	/// Current status as the provider sees it.
	fn is_signed_in(&self) -> bool;

	/// Starts an interactive sign-in. May open consent UI.
	fn sign_in(&self);

	/// Terminates the session.
	fn sign_out(&self);
}

/// Button offered next to the selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionAction {
	SignIn,
	SignOut,
}

/// Marks the session a fetch was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTicket {
	epoch: u64,
}

#[derive(Debug, Default)]
struct SessionState {
	signed_in: bool,
	/// Bumped on every transition to signed-out.
	epoch: u64,
}

/// Tracks signed-in status and mediates sign-in / sign-out.
pub struct SessionGate {
	provider: Arc<dyn AuthProvider>,
	state: Mutex<SessionState>,
}

impl SessionGate {
	pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
		Self {
			provider,
			state: Mutex::new(SessionState::default()),
		}
	}

	pub fn provider(&self) -> &dyn AuthProvider {
		self.provider.as_ref()
	}

	/// Last status reported through [`on_status_change`](Self::on_status_change).
	pub fn is_signed_in(&self) -> bool {
		self.state.lock().signed_in
	}

	pub fn epoch(&self) -> u64 {
		self.state.lock().epoch
	}

	pub fn ticket(&self) -> SessionTicket {
		SessionTicket {
			epoch: self.epoch(),
		}
	}

	/// Returns true if no sign-out happened since `ticket` was taken.
	pub fn is_same_session(&self, ticket: SessionTicket) -> bool {
		self.state.lock().epoch == ticket.epoch
	}

	/// Starts an interactive sign-in unless the provider is already signed in.
	pub fn ensure_signed_in(&self) {
		if self.provider.is_signed_in() {
			return;
		}
		info!("starting interactive sign-in");
		self.provider.sign_in();
	}

	/// Signs out and drops the cached catalog.
	///
	/// Returns false if the provider was already signed out.
	pub fn sign_out(&self, catalog: &ExperimentCatalog) -> bool {
		if !self.provider.is_signed_in() {
			return false;
		}
		info!("signing out");
		self.provider.sign_out();
		self.record(false);
		catalog.clear();
		true
	}

	/// Records a status report from the provider.
	///
	/// The caller reloads the catalog when `is_signed_in` is true.
	pub fn on_status_change(&self, is_signed_in: bool) {
		info!(signed_in = is_signed_in, "session status changed");
		self.record(is_signed_in);
	}

	fn record(&self, is_signed_in: bool) {
		let mut state = self.state.lock();
		if state.signed_in && !is_signed_in {
			state.epoch += 1;
			debug!(epoch = state.epoch, "session ended");
		}
		state.signed_in = is_signed_in;
	}

	pub fn action(&self) -> SessionAction {
		if self.is_signed_in() {
			SessionAction::SignOut
		} else {
			SessionAction::SignIn
		}
	}
}

impl std::fmt::Debug for SessionGate {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.lock();
		f.debug_struct("SessionGate")
			.field("signed_in", &state.signed_in)
			.field("epoch", &state.epoch)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

	use super::*;
	use crate::catalog::{ExperimentSource, tests::EmptySource};

	#[derive(Default)]
	struct StubAuth {
		signed_in: AtomicBool,
		sign_ins: AtomicUsize,
		sign_outs: AtomicUsize,
	}

	#[async_trait(?Send)]
	impl AuthProvider for StubAuth {
		async fn initialize(&self, _config: &WidgetConfig) -> Result<()> {
			Ok(())
		}

		fn is_signed_in(&self) -> bool {
			self.signed_in.load(Ordering::SeqCst)
		}

		fn sign_in(&self) {
			self.sign_ins.fetch_add(1, Ordering::SeqCst);
		}

		fn sign_out(&self) {
			self.sign_outs.fetch_add(1, Ordering::SeqCst);
			self.signed_in.store(false, Ordering::SeqCst);
		}
	}

	fn catalog() -> ExperimentCatalog {
		let source: Arc<dyn ExperimentSource> = Arc::new(EmptySource);
		ExperimentCatalog::new(source, expsel_protocol::ListingPath::new("a", "w", "p"))
	}

	#[test]
	fn ensure_signed_in_is_noop_when_signed_in() {
		let auth = Arc::new(StubAuth::default());
		let gate = SessionGate::new(auth.clone());

		gate.ensure_signed_in();
		assert_eq!(auth.sign_ins.load(Ordering::SeqCst), 1);

		auth.signed_in.store(true, Ordering::SeqCst);
		gate.ensure_signed_in();
		assert_eq!(auth.sign_ins.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn sign_out_bumps_epoch_once() {
		let auth = Arc::new(StubAuth::default());
		let gate = SessionGate::new(auth.clone());
		let catalog = catalog();

		assert!(!gate.sign_out(&catalog), "already signed out");

		auth.signed_in.store(true, Ordering::SeqCst);
		gate.on_status_change(true);
		let ticket = gate.ticket();
		assert!(gate.sign_out(&catalog));
		assert!(!gate.is_signed_in());
		assert!(!gate.is_same_session(ticket));

		// Provider confirms asynchronously; no second bump.
		let epoch = gate.epoch();
		gate.on_status_change(false);
		assert_eq!(gate.epoch(), epoch);
		assert_eq!(auth.sign_outs.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn action_follows_recorded_status() {
		let gate = SessionGate::new(Arc::new(StubAuth::default()));
		assert_eq!(gate.action(), SessionAction::SignIn);
		gate.on_status_change(true);
		assert_eq!(gate.action(), SessionAction::SignOut);
	}
}
