//! Selection data model shared by the engine, codec, and view.

use expsel_protocol::{Experiment, NamedRef};
use serde::{Deserialize, Serialize};

/// Label shown for a variation the remote service left unnamed.
pub const PLACEHOLDER_VARIANT_LABEL: &str = "Original";

/// A display option: `value` is the identity, `label` what the user sees.
///
/// Experiment options use the experiment id as value. Variant options use the
/// variation's position in its experiment, as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
	pub value: String,
	pub label: String,
}

impl SelectOption {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}

	pub fn for_experiment(experiment: &Experiment) -> Self {
		Self::new(experiment.id.clone(), experiment.name.clone())
	}
}

impl From<NamedRef> for SelectOption {
	fn from(named: NamedRef) -> Self {
		Self {
			value: named.id,
			label: named.name,
		}
	}
}

impl From<&SelectOption> for NamedRef {
	fn from(option: &SelectOption) -> Self {
		NamedRef::new(option.value.clone(), option.label.clone())
	}
}

/// The user's current `(experiment, variant)` choice.
///
/// A variant is only meaningful relative to the experiment it was picked
/// under; the same index under another experiment is an unrelated variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
	pub experiment: Option<SelectOption>,
	pub variant: Option<SelectOption>,
}

impl Selection {
	pub fn new(experiment: Option<SelectOption>, variant: Option<SelectOption>) -> Self {
		Self {
			experiment,
			variant,
		}
	}

	/// Returns true when both halves are set, the only state the host persists.
	pub fn is_complete(&self) -> bool {
		self.experiment.is_some() && self.variant.is_some()
	}

	pub fn is_empty(&self) -> bool {
		self.experiment.is_none() && self.variant.is_none()
	}
}

/// Options offered by the variant selector.
///
/// `Unavailable` hides the variant selector altogether, while
/// `Available(vec![])` still shows an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VariantOptions {
	#[default]
	Unavailable,
	Available(Vec<SelectOption>),
}

impl VariantOptions {
	/// Derives the options for `experiment` from a catalog snapshot.
	///
	/// Unavailable when no experiment is chosen, the catalog is not loaded,
	/// or the experiment is not part of it.
	pub fn derive(experiment: Option<&SelectOption>, catalog: Option<&[Experiment]>) -> Self {
		let found = experiment.zip(catalog).and_then(|(selected, experiments)| {
			experiments.iter().find(|e| e.id == selected.value)
		});
		match found {
			Some(experiment) => Self::Available(
				experiment
					.variations
					.iter()
					.enumerate()
					.map(|(index, variation)| {
						let label = if variation.name.is_empty() {
							PLACEHOLDER_VARIANT_LABEL
						} else {
							variation.name.as_str()
						};
						SelectOption::new(index.to_string(), label)
					})
					.collect(),
			),
			None => Self::Unavailable,
		}
	}

	pub fn as_slice(&self) -> Option<&[SelectOption]> {
		match self {
			Self::Available(options) => Some(options),
			Self::Unavailable => None,
		}
	}

	pub fn is_available(&self) -> bool {
		matches!(self, Self::Available(_))
	}

	/// Looks up an option by value.
	pub fn find(&self, value: &str) -> Option<&SelectOption> {
		self.as_slice()?.iter().find(|option| option.value == value)
	}
}

#[cfg(test)]
mod tests {
	use expsel_protocol::Variation;

	use super::*;

	fn exp_one() -> Experiment {
		Experiment {
			id: "E1".into(),
			name: "Exp One".into(),
			variations: vec![Variation::new("Control"), Variation::new("")],
		}
	}

	#[test]
	fn unnamed_variation_gets_placeholder_label() {
		let catalog = [exp_one()];
		let options = VariantOptions::derive(Some(&SelectOption::new("E1", "Exp One")), Some(&catalog));
		assert_eq!(
			options,
			VariantOptions::Available(vec![
				SelectOption::new("0", "Control"),
				SelectOption::new("1", "Original"),
			])
		);
	}

	#[test]
	fn unknown_or_missing_experiment_is_unavailable() {
		let catalog = [exp_one()];
		let unknown = SelectOption::new("E404", "Gone");
		assert_eq!(VariantOptions::derive(Some(&unknown), Some(&catalog)), VariantOptions::Unavailable);
		assert_eq!(VariantOptions::derive(None, Some(&catalog)), VariantOptions::Unavailable);
		assert_eq!(
			VariantOptions::derive(Some(&SelectOption::new("E1", "Exp One")), None),
			VariantOptions::Unavailable
		);
	}

	#[test]
	fn experiment_without_variations_is_available_but_empty() {
		let catalog = [Experiment {
			id: "E2".into(),
			name: "Empty".into(),
			variations: vec![],
		}];
		let options = VariantOptions::derive(Some(&SelectOption::new("E2", "Empty")), Some(&catalog));
		assert!(options.is_available());
		assert_eq!(options.as_slice(), Some(&[][..]));
	}

	#[test]
	fn selection_completeness() {
		let mut selection = Selection::default();
		assert!(selection.is_empty());
		selection.experiment = Some(SelectOption::new("E1", "Exp One"));
		assert!(!selection.is_complete());
		selection.variant = Some(SelectOption::new("0", "Control"));
		assert!(selection.is_complete());
	}
}
