//! RAII listener registrations.
//!
//! Collaborators that accept callbacks (window resize, auth status) hand back
//! a [`Subscription`]; dropping it runs the collaborator's deregistration.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a registered listener.
pub type ListenerId = u64;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Returns a new process-unique listener ID.
pub fn next_listener_id() -> ListenerId {
	NEXT_LISTENER_ID.fetch_add(1, Ordering::SeqCst)
}

/// Handle that deregisters a listener on drop.
pub struct Subscription {
	id: ListenerId,
	dropper: Option<Arc<dyn Fn(ListenerId)>>,
}

impl Subscription {
	/// Creates a subscription that calls `dropper` exactly once.
	pub fn new(id: ListenerId, dropper: Arc<dyn Fn(ListenerId)>) -> Self {
		Self {
			id,
			dropper: Some(dropper),
		}
	}

	/// A subscription with nothing to deregister.
	pub fn detached() -> Self {
		Self {
			id: next_listener_id(),
			dropper: None,
		}
	}

	pub fn id(&self) -> ListenerId {
		self.id
	}

	/// Explicitly unsubscribes. Equivalent to dropping.
	pub fn unsubscribe(mut self) {
		self.release();
	}

	fn release(&mut self) {
		if let Some(dropper) = self.dropper.take() {
			(dropper)(self.id);
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.release();
	}
}

impl std::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscription")
			.field("id", &self.id)
			.field("active", &self.dropper.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::AtomicUsize;

	use super::*;

	fn counting_dropper() -> (Arc<AtomicUsize>, Arc<dyn Fn(ListenerId)>) {
		let calls = Arc::new(AtomicUsize::new(0));
		let calls_clone = Arc::clone(&calls);
		let dropper = Arc::new(move |_id: ListenerId| {
			calls_clone.fetch_add(1, Ordering::SeqCst);
		});
		(calls, dropper)
	}

	#[test]
	fn test_listener_id_increments() {
		let id1 = next_listener_id();
		let id2 = next_listener_id();
		assert!(id2 > id1);
	}

	#[test]
	fn test_subscription_unsubscribe_runs_dropper_once() {
		let (calls, dropper) = counting_dropper();
		let sub = Subscription::new(7, dropper);
		assert_eq!(calls.load(Ordering::SeqCst), 0);

		sub.unsubscribe();
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_subscription_drop() {
		let (calls, dropper) = counting_dropper();
		{
			let _sub = Subscription::new(1, dropper);
		}
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_detached_subscription_is_inert() {
		let sub = Subscription::detached();
		assert!(format!("{sub:?}").contains("active: false"));
	}
}
