//! Fake collaborators for driving an ExperimentSelector without a browser.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use expsel::protocol::{Experiment, ListingPath, ListingResponse, Variation, WidgetConfig};
use expsel::{
	AuthProvider, Collaborators, Error, ExperimentSelector, ExperimentSource, HostSink, Layout,
	ListenerId, ResizeEvents, Result, Scheduler, SelectorOptions, Subscription, next_listener_id,
};
use parking_lot::Mutex;
use tokio::sync::oneshot;

pub type Reply = oneshot::Sender<Result<ListingResponse>>;

#[derive(Default)]
pub struct FakeAuth {
	pub signed_in: AtomicBool,
	pub sign_ins: AtomicUsize,
	pub sign_outs: AtomicUsize,
	pub fail_init: AtomicBool,
}

impl FakeAuth {
	pub fn sign_ins(&self) -> usize {
		self.sign_ins.load(Ordering::SeqCst)
	}
}

#[async_trait(?Send)]
impl AuthProvider for FakeAuth {
	async fn initialize(&self, _config: &WidgetConfig) -> Result<()> {
		if self.fail_init.load(Ordering::SeqCst) {
			return Err(Error::Auth("idpiframe_initialization_failed".into()));
		}
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

enum Scripted {
	Ready(Result<ListingResponse>),
	Deferred(oneshot::Receiver<Result<ListingResponse>>),
}

/// Listing service answering from a queue, in request order.
#[derive(Default)]
pub struct ScriptedSource {
	queue: Mutex<VecDeque<Scripted>>,
	pub requests: AtomicUsize,
}

impl ScriptedSource {
	pub fn respond(&self, experiments: Vec<Experiment>) {
		self.queue
			.lock()
			.push_back(Scripted::Ready(Ok(ListingResponse::items(experiments))));
	}

	pub fn respond_error(&self, code: i64, message: &str) {
		self.queue
			.lock()
			.push_back(Scripted::Ready(Ok(ListingResponse::error(code, message))));
	}

	pub fn fail(&self, error: Error) {
		self.queue.lock().push_back(Scripted::Ready(Err(error)));
	}

	/// Queues a response the test completes later through the returned sender.
	pub fn defer(&self) -> Reply {
		let (tx, rx) = oneshot::channel();
		self.queue.lock().push_back(Scripted::Deferred(rx));
		tx
	}

	pub fn requests(&self) -> usize {
		self.requests.load(Ordering::SeqCst)
	}
}

#[async_trait(?Send)]
impl ExperimentSource for ScriptedSource {
	async fn list_experiments(&self, _path: &ListingPath) -> Result<ListingResponse> {
		self.requests.fetch_add(1, Ordering::SeqCst);
		let next = self.queue.lock().pop_front();
		match next {
			Some(Scripted::Ready(response)) => response,
			Some(Scripted::Deferred(rx)) => rx
				.await
				.unwrap_or_else(|_| Err(Error::Transport("reply dropped".into()))),
			None => Err(Error::Transport("no scripted response".into())),
		}
	}
}

#[derive(Default)]
pub struct HostRecorder {
	pub values: Mutex<Vec<Option<String>>>,
	pub heights: Mutex<Vec<u32>>,
}

impl HostRecorder {
	pub fn values(&self) -> Vec<Option<String>> {
		self.values.lock().clone()
	}

	pub fn last_value(&self) -> Option<Option<String>> {
		self.values.lock().last().cloned()
	}

	pub fn heights(&self) -> Vec<u32> {
		self.heights.lock().clone()
	}
}

impl HostSink for HostRecorder {
	fn set_height(&self, pixels: u32) {
		self.heights.lock().push(pixels);
	}

	fn set_value(&self, value: Option<&str>) {
		self.values.lock().push(value.map(str::to_owned));
	}
}

pub struct FixedLayout(pub AtomicU32);

impl Layout for FixedLayout {
	fn content_height(&self) -> u32 {
		self.0.load(Ordering::SeqCst)
	}
}

type Listeners = Arc<Mutex<Vec<(ListenerId, Arc<dyn Fn()>)>>>;

#[derive(Default)]
pub struct FakeWindow {
	listeners: Listeners,
}

impl FakeWindow {
	pub fn listener_count(&self) -> usize {
		self.listeners.lock().len()
	}

	pub fn resize(&self) {
		let listeners: Vec<_> = self.listeners.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
		for listener in listeners {
			listener();
		}
	}
}

impl ResizeEvents for FakeWindow {
	fn on_resize(&self, callback: Arc<dyn Fn()>) -> Subscription {
		let id = next_listener_id();
		self.listeners.lock().push((id, callback));
		let listeners = Arc::clone(&self.listeners);
		Subscription::new(
			id,
			Arc::new(move |id: ListenerId| listeners.lock().retain(|(listener, _)| *listener != id)),
		)
	}
}

/// Holds scheduled tasks until the test runs them.
#[derive(Default)]
pub struct ManualScheduler {
	tasks: Mutex<Vec<(Duration, Box<dyn FnOnce()>)>>,
}

impl ManualScheduler {
	pub fn pending(&self) -> usize {
		self.tasks.lock().len()
	}

	pub fn run_all(&self) -> usize {
		let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
		let count = tasks.len();
		for (_, task) in tasks {
			task();
		}
		count
	}
}

impl Scheduler for ManualScheduler {
	fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
		self.tasks.lock().push((delay, task));
	}
}

pub struct Harness {
	pub selector: ExperimentSelector,
	pub auth: Arc<FakeAuth>,
	pub source: Arc<ScriptedSource>,
	pub host: Arc<HostRecorder>,
	pub layout: Arc<FixedLayout>,
	pub window: Arc<FakeWindow>,
	pub scheduler: Arc<ManualScheduler>,
}

pub fn config() -> WidgetConfig {
	WidgetConfig {
		client_id: "client-123.apps.googleusercontent.com".into(),
		account_id: "1234".into(),
		web_property_id: "UA-1234-1".into(),
		profile_id: "5678".into(),
	}
}

pub fn harness(options: SelectorOptions) -> Harness {
	let auth = Arc::new(FakeAuth::default());
	let source = Arc::new(ScriptedSource::default());
	let host = Arc::new(HostRecorder::default());
	let layout = Arc::new(FixedLayout(AtomicU32::new(96)));
	let window = Arc::new(FakeWindow::default());
	let scheduler = Arc::new(ManualScheduler::default());

	let selector = ExperimentSelector::new(
		options,
		Collaborators {
			auth: auth.clone(),
			source: source.clone(),
			sink: host.clone(),
			layout: layout.clone(),
			resize: window.clone(),
			scheduler: scheduler.clone(),
		},
	);

	Harness {
		selector,
		auth,
		source,
		host,
		layout,
		window,
		scheduler,
	}
}

/// A harness whose provider already reports signed in.
pub fn signed_in_harness(options: SelectorOptions) -> Harness {
	let harness = harness(options);
	harness.auth.signed_in.store(true, Ordering::SeqCst);
	harness
}

pub fn experiment(id: &str, name: &str, variations: &[&str]) -> Experiment {
	Experiment {
		id: id.into(),
		name: name.into(),
		variations: variations.iter().map(|name| Variation::new(*name)).collect(),
	}
}

pub fn exp_one() -> Experiment {
	experiment("E1", "Exp One", &["Control", ""])
}

pub fn exp_two() -> Experiment {
	experiment("E2", "Exp Two", &["Red", "Green", "Blue"])
}
