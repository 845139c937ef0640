//! Experiment/variant selection for embeddable analytics widgets.
//!
//! The widget lets a user pick an experiment and one of its variants from a
//! remote analytics account, and stores the choice in a host-managed field.
//!
//! # Components
//!
//! - [`SessionGate`] - signed-in status; every catalog fetch goes through it
//! - [`ExperimentCatalog`] - last fetched experiment listing
//! - [`SelectionEngine`] - the experiment → variant state machine
//! - [`ValueCodec`] - selection ⇄ persisted host text
//! - [`HostBridge`] - disabled flag in, height and value out
//! - [`ExperimentSelector`] - all of the above bound to one host field
//!
//! Collaborators outside the widget (auth provider, listing service, host
//! setters, layout, timers) are traits so the same core runs in the browser
//! and under tests.

pub mod catalog;
pub mod codec;
pub mod engine;
pub mod error;
pub mod host;
pub mod selection;
pub mod selector;
pub mod session;
pub mod subscription;
pub mod view;

pub use catalog::{ExperimentCatalog, ExperimentSource, LoadOutcome};
pub use codec::ValueCodec;
pub use engine::{SelectionEngine, Transition};
pub use error::{Error, Result};
#[cfg(feature = "tokio")]
pub use host::TokioScheduler;
pub use host::{
	DEFAULT_HEIGHT_DELAY, DeferredTask, HostBridge, HostSink, Layout, ResizeEvents, Scheduler,
};
pub use selection::{PLACEHOLDER_VARIANT_LABEL, SelectOption, Selection, VariantOptions};
pub use selector::{Collaborators, ExperimentSelector, SelectorOptions};
pub use session::{AuthProvider, SessionAction, SessionGate, SessionTicket};
pub use subscription::{ListenerId, Subscription, next_listener_id};
pub use view::SelectorView;

pub use expsel_protocol as protocol;
