//! Cascading experiment → variant selection state machine.
//!
//! The engine's state is the product of two independent facts: the current
//! [`Selection`] and whether a catalog snapshot is available. The engine never
//! fetches; callers pass the snapshot they hold into each transition.
//!
//! Transitions:
//!
//! 1. **Experiment changed** - the variant is cleared unless the same
//!    experiment was re-selected, and variant options are re-derived.
//! 2. **Variant changed** - recorded as-is.
//! 3. **Catalog reloaded** - variant options re-derived for the current
//!    experiment; the chosen variant index is kept.
//!
//! 1 and 2 produce a new value for the host, 3 does not. While disabled,
//! 1 and 2 are rejected without touching state.

use expsel_protocol::Experiment;
use tracing::{debug, warn};

use crate::selection::{SelectOption, Selection, VariantOptions};

/// Result of a user-driven transition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Transition {
	/// State changed; carries the selection to encode for the host.
	Applied(Selection),
	/// The engine is disabled; nothing changed.
	Rejected,
}

impl Transition {
	pub fn is_applied(&self) -> bool {
		matches!(self, Transition::Applied(_))
	}
}

#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
	selection: Selection,
	variant_options: VariantOptions,
	disabled: bool,
}

impl SelectionEngine {
	/// Seeds the engine from a decoded initial value.
	///
	/// Variant options stay unavailable until a catalog is supplied.
	pub fn new(initial: Selection, disabled: bool) -> Self {
		Self {
			selection: initial,
			variant_options: VariantOptions::Unavailable,
			disabled,
		}
	}

	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	pub fn variant_options(&self) -> &VariantOptions {
		&self.variant_options
	}

	pub fn is_disabled(&self) -> bool {
		self.disabled
	}

	pub fn set_disabled(&mut self, disabled: bool) {
		if self.disabled != disabled {
			debug!(disabled, "selection engine disabled flag changed");
		}
		self.disabled = disabled;
	}

	/// Transition 1: the user picked `experiment` (or cleared it).
	pub fn select_experiment(
		&mut self,
		experiment: Option<SelectOption>,
		catalog: Option<&[Experiment]>,
	) -> Transition {
		if self.disabled {
			debug!("experiment change rejected while disabled");
			return Transition::Rejected;
		}

		let reselected = matches!(
			(&self.selection.experiment, &experiment),
			(Some(previous), Some(next)) if previous.value == next.value
		);

		self.variant_options = VariantOptions::derive(experiment.as_ref(), catalog);
		if !reselected {
			self.selection.variant = None;
		}
		debug!(
			experiment = experiment.as_ref().map(|e| e.value.as_str()),
			reselected,
			"experiment selected"
		);
		self.selection.experiment = experiment;

		Transition::Applied(self.selection.clone())
	}

	/// Transition 2: the user picked `variant` (or cleared it).
	pub fn select_variant(&mut self, variant: Option<SelectOption>) -> Transition {
		if self.disabled {
			debug!("variant change rejected while disabled");
			return Transition::Rejected;
		}

		debug!(variant = variant.as_ref().map(|v| v.value.as_str()), "variant selected");
		self.selection.variant = variant;
		Transition::Applied(self.selection.clone())
	}

	/// Transition 3: a new catalog snapshot is available (or was dropped).
	///
	/// The chosen variant keeps its index. If that index still exists its
	/// label is refreshed from the new options; if it does not, the stale
	/// choice is kept as-is so existing persisted values stay readable.
	pub fn refresh(&mut self, catalog: Option<&[Experiment]>) {
		self.variant_options = VariantOptions::derive(self.selection.experiment.as_ref(), catalog);

		let Some(variant) = self.selection.variant.as_mut() else {
			return;
		};
		match self.variant_options.find(&variant.value) {
			Some(fresh) => variant.label.clone_from(&fresh.label),
			None if self.variant_options.is_available() => {
				warn!(variant = %variant.value, "selected variant is no longer offered by its experiment");
			}
			None => {}
		}
	}

	/// Returns true if the chosen variant index is outside the current options.
	pub fn stale_variant(&self) -> bool {
		match (&self.selection.variant, &self.variant_options) {
			(Some(variant), VariantOptions::Available(options)) => {
				!options.iter().any(|option| option.value == variant.value)
			}
			_ => false,
		}
	}

	/// Options for the experiment selector.
	///
	/// Until a catalog is loaded, the currently selected experiment is the
	/// only option so a restored value can still be displayed.
	pub fn experiment_options(&self, catalog: Option<&[Experiment]>) -> Vec<SelectOption> {
		match catalog {
			Some(experiments) => experiments.iter().map(SelectOption::for_experiment).collect(),
			None => self.selection.experiment.iter().cloned().collect(),
		}
	}

	/// Options for the variant selector, or `None` to hide it.
	///
	/// While options are unavailable, a selected variant is shown on its own.
	pub fn visible_variant_options(&self) -> Option<Vec<SelectOption>> {
		match (&self.variant_options, &self.selection.variant) {
			(VariantOptions::Available(options), _) => Some(options.clone()),
			(VariantOptions::Unavailable, Some(variant)) => Some(vec![variant.clone()]),
			(VariantOptions::Unavailable, None) => None,
		}
	}
}
