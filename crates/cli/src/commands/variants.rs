use expsel::protocol::Experiment;
use expsel::{SelectOption, SelectionEngine, ValueCodec};
use serde::Serialize;

use crate::cli::VariantsArgs;
use crate::error::{CliError, Result};

use super::load_catalog;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VariantsReport {
	pub experiment: SelectOption,
	pub options: Vec<SelectOption>,
	/// Variant carried over from `--value`, relabelled from the listing.
	pub selected: Option<SelectOption>,
	/// The stored variant index is outside the listed variations.
	pub stale: bool,
	/// `--value` named a different experiment; its variant was dropped.
	pub switched: bool,
}

impl VariantsReport {
	pub fn warnings(&self) -> Vec<String> {
		let mut warnings = Vec::new();
		if let (true, Some(selected)) = (self.stale, &self.selected) {
			warnings.push(format!(
				"stored variant {} ({}) no longer exists in {}",
				selected.value, selected.label, self.experiment.value
			));
		}
		if self.switched {
			warnings.push(format!(
				"stored value belongs to another experiment; its variant does not apply to {}",
				self.experiment.value
			));
		}
		warnings
	}
}

pub async fn run(args: &VariantsArgs) -> Result<VariantsReport> {
	let experiments = load_catalog(&args.listing).await?;
	preview(&experiments, &args.experiment_id, args.value.as_deref())
}

/// Replays what the widget does when `experiment_id` is picked with `value`
/// already stored.
pub fn preview(
	catalog: &[Experiment],
	experiment_id: &str,
	value: Option<&str>,
) -> Result<VariantsReport> {
	let experiment = catalog
		.iter()
		.find(|experiment| experiment.id == experiment_id)
		.ok_or_else(|| CliError::ExperimentNotFound {
			id: experiment_id.to_string(),
		})?;

	let initial = ValueCodec::decode(value);
	let switched = initial
		.experiment
		.as_ref()
		.is_some_and(|stored| stored.value != experiment.id);

	let mut engine = SelectionEngine::new(initial, false);
	let _ = engine.select_experiment(Some(SelectOption::for_experiment(experiment)), Some(catalog));
	engine.refresh(Some(catalog));

	Ok(VariantsReport {
		experiment: SelectOption::for_experiment(experiment),
		options: engine.visible_variant_options().unwrap_or_default(),
		selected: engine.selection().variant.clone(),
		stale: engine.stale_variant(),
		switched,
	})
}
