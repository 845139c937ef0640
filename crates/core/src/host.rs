//! Adapter between the selector and the embedding host.
//!
//! The host relationship is split into narrow interfaces: the host calls
//! [`ExperimentSelector::set_disabled`](crate::ExperimentSelector::set_disabled)
//! inbound, and the selector calls [`HostSink`] outbound. Layout measurement,
//! window resize notifications, and timers are separate collaborators so the
//! bridge can run outside a browser.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::subscription::Subscription;

/// Delay before reporting content height, letting rendering settle.
pub const DEFAULT_HEIGHT_DELAY: Duration = Duration::from_millis(10);

/// Outbound host setters.
pub trait HostSink {
	/// Reports the widget's content height in CSS pixels.
	fn set_height(&self, pixels: u32);

	/// Stores the field value; `None` clears it.
	fn set_value(&self, value: Option<&str>);
}

/// Measures rendered content.
pub trait Layout {
	fn content_height(&self) -> u32;
}

/// Source of window resize notifications.
pub trait ResizeEvents {
	/// Registers `callback`; the listener lives as long as the subscription.
	fn on_resize(&self, callback: Arc<dyn Fn()>) -> Subscription;
}

/// Runs a task once after a delay.
pub trait Scheduler {
	fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// Delayed side effect that coalesces repeated requests.
///
/// While a run is pending, further [`schedule`](Self::schedule) calls are
/// absorbed into it.
pub struct DeferredTask {
	scheduler: Arc<dyn Scheduler>,
	delay: Duration,
	pending: Arc<AtomicBool>,
	action: Arc<dyn Fn()>,
}

impl DeferredTask {
	pub fn new(scheduler: Arc<dyn Scheduler>, delay: Duration, action: Arc<dyn Fn()>) -> Self {
		Self {
			scheduler,
			delay,
			pending: Arc::new(AtomicBool::new(false)),
			action,
		}
	}

	pub fn schedule(&self) {
		if self.pending.swap(true, Ordering::SeqCst) {
			trace!("deferred task already pending");
			return;
		}
		let pending = Arc::clone(&self.pending);
		let action = Arc::clone(&self.action);
		self.scheduler.schedule(
			self.delay,
			Box::new(move || {
				pending.store(false, Ordering::SeqCst);
				action();
			}),
		);
	}

	pub fn is_pending(&self) -> bool {
		self.pending.load(Ordering::SeqCst)
	}
}

/// [`Scheduler`] backed by tokio timers.
///
/// Tasks are spawned with [`tokio::task::spawn_local`], so scheduling must
/// happen inside a [`tokio::task::LocalSet`].
#[cfg(feature = "tokio")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

#[cfg(feature = "tokio")]
impl Scheduler for TokioScheduler {
	fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
		tokio::task::spawn_local(async move {
			tokio::time::sleep(delay).await;
			task();
		});
	}
}

/// Outbound half of the host relationship plus resize scoping.
pub struct HostBridge {
	sink: Arc<dyn HostSink>,
	layout: Arc<dyn Layout>,
	resize: Arc<dyn ResizeEvents>,
	height_report: DeferredTask,
	resize_subscription: Mutex<Option<Subscription>>,
}

impl HostBridge {
	pub fn new(
		sink: Arc<dyn HostSink>,
		layout: Arc<dyn Layout>,
		resize: Arc<dyn ResizeEvents>,
		scheduler: Arc<dyn Scheduler>,
		height_delay: Duration,
	) -> Self {
		let report = height_reporter(Arc::clone(&sink), Arc::clone(&layout));
		Self {
			sink,
			layout,
			resize,
			height_report: DeferredTask::new(scheduler, height_delay, report),
			resize_subscription: Mutex::new(None),
		}
	}

	/// Starts reporting height on window resize. Idempotent.
	pub fn activate(&self) {
		let mut slot = self.resize_subscription.lock();
		if slot.is_some() {
			return;
		}
		let report = height_reporter(Arc::clone(&self.sink), Arc::clone(&self.layout));
		let subscription = self.resize.on_resize(report);
		debug!(listener = subscription.id(), "resize listener registered");
		*slot = Some(subscription);
	}

	/// Drops the resize listener registered by [`activate`](Self::activate).
	pub fn deactivate(&self) {
		if let Some(subscription) = self.resize_subscription.lock().take() {
			debug!(listener = subscription.id(), "resize listener removed");
			subscription.unsubscribe();
		}
	}

	pub fn is_active(&self) -> bool {
		self.resize_subscription.lock().is_some()
	}

	/// Reports content height after the settle delay.
	pub fn schedule_height_report(&self) {
		self.height_report.schedule();
	}

	/// Pushes an encoded value (or the absence marker) to the host.
	pub fn push_value(&self, value: Option<String>) {
		debug!(present = value.is_some(), "pushing value to host");
		self.sink.set_value(value.as_deref());
	}
}

fn height_reporter(sink: Arc<dyn HostSink>, layout: Arc<dyn Layout>) -> Arc<dyn Fn()> {
	Arc::new(move || {
		let height = layout.content_height();
		trace!(height, "reporting content height");
		sink.set_height(height);
	})
}
