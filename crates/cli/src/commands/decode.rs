use std::io::Read;

use expsel::protocol::snapshot_from_text;
use expsel::{SelectOption, ValueCodec};
use serde::Serialize;

use crate::cli::DecodeArgs;
use crate::error::{CliError, Result};

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DecodeData {
	pub experiment: Option<SelectOption>,
	pub variant: Option<SelectOption>,
	/// Whether the host would keep this value (both halves present).
	pub complete: bool,
	/// Canonical re-encoding; `null` for the absence marker.
	pub value: Option<String>,
}

pub fn run(args: &DecodeArgs) -> Result<DecodeData> {
	let text = match &args.text {
		Some(text) => text.clone(),
		None => {
			let mut buf = String::new();
			std::io::stdin().read_to_string(&mut buf)?;
			buf
		}
	};
	decode_text(&text)
}

/// Unlike the widget, which falls back to an empty selection, the CLI
/// reports malformed text as an error.
pub fn decode_text(text: &str) -> Result<DecodeData> {
	snapshot_from_text(text.trim()).map_err(CliError::InvalidValue)?;

	let selection = ValueCodec::decode(Some(text));
	Ok(DecodeData {
		complete: selection.is_complete(),
		value: ValueCodec::encode(&selection),
		experiment: selection.experiment,
		variant: selection.variant,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_full_value() {
		let data = decode_text(
			r#"["E1","1",{"experiment":{"id":"E1","name":"Exp One"},"variant":{"id":"1","name":"Original"}}]"#,
		)
		.unwrap();
		assert!(data.complete);
		assert_eq!(data.experiment, Some(SelectOption::new("E1", "Exp One")));
		assert_eq!(data.variant, Some(SelectOption::new("1", "Original")));
	}

	#[test]
	fn null_is_the_absence_marker() {
		let data = decode_text("null").unwrap();
		assert!(!data.complete);
		assert_eq!(data.value, None);
	}

	#[test]
	fn malformed_text_is_an_error() {
		let err = decode_text("[\"E1\", {").unwrap_err();
		assert!(matches!(err, CliError::InvalidValue(_)));
	}
}
