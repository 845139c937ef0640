//! Serializable render model handed to whatever draws the selectors.

use expsel_protocol::Experiment;
use serde::Serialize;

use crate::engine::SelectionEngine;
use crate::selection::SelectOption;
use crate::session::SessionAction;

/// Everything a renderer needs to draw the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorView {
	pub experiment_options: Vec<SelectOption>,
	pub selected_experiment: Option<SelectOption>,
	/// `None` hides the variant selector.
	pub variant_options: Option<Vec<SelectOption>>,
	pub selected_variant: Option<SelectOption>,
	pub disabled: bool,
	/// Session button; hidden while disabled.
	pub session_action: Option<SessionAction>,
}

impl SelectorView {
	pub(crate) fn build(
		engine: &SelectionEngine,
		catalog: Option<&[Experiment]>,
		action: SessionAction,
	) -> Self {
		let selection = engine.selection();
		Self {
			experiment_options: engine.experiment_options(catalog),
			selected_experiment: selection.experiment.clone(),
			variant_options: engine.visible_variant_options(),
			selected_variant: selection.variant.clone(),
			disabled: engine.is_disabled(),
			session_action: (!engine.is_disabled()).then_some(action),
		}
	}
}
