use expsel::protocol::Experiment;
use expsel::{SelectOption, VariantOptions};
use serde::Serialize;

use crate::cli::ListArgs;
use crate::error::Result;

use super::load_catalog;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListData {
	pub path: String,
	pub experiments: Vec<ExperimentSummary>,
}

/// One experiment with its variants labelled the way the widget shows them.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ExperimentSummary {
	pub id: String,
	pub name: String,
	pub variants: Vec<SelectOption>,
}

impl ExperimentSummary {
	pub fn from_experiment(experiment: &Experiment) -> Self {
		let option = SelectOption::for_experiment(experiment);
		let variants = VariantOptions::derive(Some(&option), Some(std::slice::from_ref(experiment)))
			.as_slice()
			.map(<[SelectOption]>::to_vec)
			.unwrap_or_default();
		Self {
			id: option.value,
			name: option.label,
			variants,
		}
	}
}

pub async fn run(args: &ListArgs) -> Result<ListData> {
	let experiments = load_catalog(&args.listing).await?;
	Ok(ListData {
		path: args.listing.path().to_string(),
		experiments: experiments.iter().map(ExperimentSummary::from_experiment).collect(),
	})
}

#[cfg(test)]
mod tests {
	use expsel::protocol::Variation;

	use super::*;

	#[test]
	fn summary_labels_unnamed_variations() {
		let experiment = Experiment {
			id: "E1".into(),
			name: "Exp One".into(),
			variations: vec![Variation::new("Control"), Variation::new("")],
		};
		let summary = ExperimentSummary::from_experiment(&experiment);
		assert_eq!(
			summary.variants,
			vec![SelectOption::new("0", "Control"), SelectOption::new("1", "Original")]
		);
	}
}
