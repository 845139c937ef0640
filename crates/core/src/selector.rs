//! The mounted widget: wires the gate, catalog, engine, codec, and bridge.
//!
//! Every entry point corresponds to one external event (host property
//! change, auth status callback, user interaction). Each performs its state
//! update synchronously; only catalog loads suspend, and they apply their
//! result in a single step when the fetch completes.

use std::sync::Arc;
use std::time::Duration;

use expsel_protocol::{Experiment, ListingPath, WidgetConfig};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::Result;
use crate::catalog::{ExperimentCatalog, ExperimentSource, LoadOutcome};
use crate::codec::ValueCodec;
use crate::engine::{SelectionEngine, Transition};
use crate::host::{DEFAULT_HEIGHT_DELAY, HostBridge, HostSink, Layout, ResizeEvents, Scheduler};
use crate::selection::{SelectOption, Selection};
use crate::session::{AuthProvider, SessionGate};
use crate::view::SelectorView;

/// What the host hands the widget at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOptions {
	/// Persisted text of the field, if any.
	pub initial_value: Option<String>,
	pub disabled: bool,
	pub config: WidgetConfig,
	/// Settle delay before reporting content height.
	pub height_delay: Duration,
}

impl SelectorOptions {
	pub fn new(config: WidgetConfig) -> Self {
		Self {
			initial_value: None,
			disabled: false,
			config,
			height_delay: DEFAULT_HEIGHT_DELAY,
		}
	}

	pub fn initial_value(mut self, value: impl Into<String>) -> Self {
		self.initial_value = Some(value.into());
		self
	}

	pub fn disabled(mut self, disabled: bool) -> Self {
		self.disabled = disabled;
		self
	}

	pub fn height_delay(mut self, delay: Duration) -> Self {
		self.height_delay = delay;
		self
	}
}

/// External collaborators the widget drives.
#[derive(Clone)]
pub struct Collaborators {
	pub auth: Arc<dyn AuthProvider>,
	pub source: Arc<dyn ExperimentSource>,
	pub sink: Arc<dyn HostSink>,
	pub layout: Arc<dyn Layout>,
	pub resize: Arc<dyn ResizeEvents>,
	pub scheduler: Arc<dyn Scheduler>,
}

/// Experiment/variant picker bound to one host field.
pub struct ExperimentSelector {
	config: WidgetConfig,
	gate: SessionGate,
	catalog: ExperimentCatalog,
	engine: Mutex<SelectionEngine>,
	bridge: HostBridge,
}

impl ExperimentSelector {
	/// Seeds the selection from the host's initial value.
	///
	/// Malformed initial values are treated as "no selection".
	pub fn new(options: SelectorOptions, collaborators: Collaborators) -> Self {
		let missing = options.config.missing_fields();
		if !missing.is_empty() {
			warn!(?missing, "widget configuration is incomplete");
		}

		let initial = ValueCodec::decode(options.initial_value.as_deref());
		debug!(?initial, disabled = options.disabled, "selector created");

		let Collaborators {
			auth,
			source,
			sink,
			layout,
			resize,
			scheduler,
		} = collaborators;

		Self {
			gate: SessionGate::new(auth),
			catalog: ExperimentCatalog::new(source, ListingPath::from_config(&options.config)),
			engine: Mutex::new(SelectionEngine::new(initial, options.disabled)),
			bridge: HostBridge::new(sink, layout, resize, scheduler, options.height_delay),
			config: options.config,
		}
	}

	/// Activates host listeners and performs the initial authentication check.
	///
	/// Fails only if the auth provider cannot be initialised; the widget then
	/// stays usable with its restored selection.
	pub async fn mount(&self) -> Result<()> {
		self.bridge.activate();
		self.bridge.schedule_height_report();

		let provider = self.gate.provider();
		provider.initialize(&self.config).await?;
		let signed_in = provider.is_signed_in();
		self.on_status_change(signed_in).await;
		Ok(())
	}

	/// Removes the window resize listener.
	pub fn unmount(&self) {
		self.bridge.deactivate();
	}

	/// Auth provider status callback.
	pub async fn on_status_change(&self, is_signed_in: bool) {
		self.gate.on_status_change(is_signed_in);
		if is_signed_in {
			self.load().await;
		}
	}

	/// Re-fetches the catalog. Failures are logged, never surfaced.
	pub async fn load(&self) {
		match self.catalog.load(&self.gate).await {
			Ok(LoadOutcome::Replaced(experiments)) => {
				self.engine.lock().refresh(Some(&experiments[..]));
				self.bridge.schedule_height_report();
			}
			Ok(LoadOutcome::Unauthorized | LoadOutcome::Discarded) => {}
			Err(err) => {
				warn!(error = %err, "experiment listing failed; keeping previous catalog");
			}
		}
	}

	/// The user opened either selector menu.
	pub async fn menu_opened(&self) {
		self.load().await;
	}

	/// The user picked an experiment by id, or cleared it with `None`.
	///
	/// Ids that are not among the current experiment options are ignored.
	pub fn select_experiment(&self, id: Option<&str>) {
		let snapshot = self.catalog.snapshot();
		let catalog = snapshot.as_deref();
		let transition = {
			let mut engine = self.engine.lock();
			let option = match id {
				Some(id) => match find_option(engine.experiment_options(catalog), id) {
					Some(option) => Some(option),
					None => {
						warn!(experiment = id, "ignoring unknown experiment");
						return;
					}
				},
				None => None,
			};
			engine.select_experiment(option, catalog)
		};
		self.emit(transition);
	}

	/// The user picked a variant by positional index, or cleared it.
	///
	/// Indices that are not among the visible variant options are ignored.
	pub fn select_variant(&self, index: Option<&str>) {
		let transition = {
			let mut engine = self.engine.lock();
			let option = match index {
				Some(index) => {
					let visible = engine.visible_variant_options().unwrap_or_default();
					match find_option(visible, index) {
						Some(option) => Some(option),
						None => {
							warn!(variant = index, "ignoring unknown variant");
							return;
						}
					}
				}
				None => None,
			};
			engine.select_variant(option)
		};
		self.emit(transition);
	}

	/// Host toggled the disabled flag.
	pub fn set_disabled(&self, disabled: bool) {
		self.engine.lock().set_disabled(disabled);
	}

	/// "Sign in" button.
	pub fn sign_in(&self) {
		self.gate.ensure_signed_in();
	}

	/// "Sign out" button: ends the session and forgets the catalog.
	pub fn sign_out(&self) {
		if self.gate.sign_out(&self.catalog) {
			self.engine.lock().refresh(None);
			self.bridge.schedule_height_report();
		}
	}

	pub fn selection(&self) -> Selection {
		self.engine.lock().selection().clone()
	}

	/// Encoded value for the current selection.
	pub fn current_value(&self) -> Option<String> {
		ValueCodec::encode(self.engine.lock().selection())
	}

	pub fn catalog(&self) -> Option<Arc<[Experiment]>> {
		self.catalog.snapshot()
	}

	pub fn is_signed_in(&self) -> bool {
		self.gate.is_signed_in()
	}

	pub fn is_disabled(&self) -> bool {
		self.engine.lock().is_disabled()
	}

	/// Render model for the current state.
	pub fn view(&self) -> SelectorView {
		let snapshot = self.catalog.snapshot();
		let engine = self.engine.lock();
		SelectorView::build(&engine, snapshot.as_deref(), self.gate.action())
	}

	fn emit(&self, transition: Transition) {
		if let Transition::Applied(selection) = transition {
			self.bridge.push_value(ValueCodec::encode(&selection));
			self.bridge.schedule_height_report();
		}
	}
}

impl std::fmt::Debug for ExperimentSelector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ExperimentSelector")
			.field("gate", &self.gate)
			.field("catalog", &self.catalog)
			.field("selection", &self.selection())
			.finish()
	}
}

fn find_option(options: Vec<SelectOption>, value: &str) -> Option<SelectOption> {
	options.into_iter().find(|option| option.value == value)
}
