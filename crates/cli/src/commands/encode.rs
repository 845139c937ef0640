use expsel::{SelectOption, Selection, ValueCodec};

use crate::cli::EncodeArgs;
use crate::error::Result;

pub fn run(args: &EncodeArgs) -> Result<String> {
	let selection = Selection::new(
		Some(SelectOption::new(&args.experiment_id, &args.experiment_name)),
		Some(SelectOption::new(args.variant_index.to_string(), &args.variant_name)),
	);
	ValueCodec::encode(&selection)
		.ok_or_else(|| anyhow::anyhow!("selection could not be encoded").into())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn encodes_host_format() {
		let args = EncodeArgs {
			experiment_id: "E1".into(),
			experiment_name: "Exp One".into(),
			variant_index: 0,
			variant_name: "Control".into(),
		};
		assert_eq!(
			run(&args).unwrap(),
			r#"["E1","0",{"experiment":{"id":"E1","name":"Exp One"},"variant":{"id":"0","name":"Control"}}]"#
		);
	}
}
