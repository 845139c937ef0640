//! Conversion between [`Selection`] and the host's persisted text.

use expsel_protocol::{NamedRef, PersistedValue, snapshot_from_text};
use tracing::warn;

use crate::selection::{SelectOption, Selection};

/// Encodes selections for the host and decodes the host's initial value.
pub struct ValueCodec;

impl ValueCodec {
	/// Rebuilds a selection from persisted text.
	///
	/// Only the structured snapshot (last array element) is read. Absent,
	/// `null`, or malformed text yields an empty selection.
	pub fn decode(raw: Option<&str>) -> Selection {
		let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
			return Selection::default();
		};
		match snapshot_from_text(text) {
			Ok(Some(snapshot)) => Selection::new(
				snapshot.experiment.map(SelectOption::from),
				snapshot.variant.map(SelectOption::from),
			),
			Ok(None) => Selection::default(),
			Err(err) => {
				warn!(error = %err, "ignoring malformed persisted value");
				Selection::default()
			}
		}
	}

	/// Builds the persisted tuple, or `None` unless both halves are set.
	pub fn to_persisted(selection: &Selection) -> Option<PersistedValue> {
		let (experiment, variant) = selection.experiment.as_ref().zip(selection.variant.as_ref())?;
		Some(PersistedValue::new(NamedRef::from(experiment), NamedRef::from(variant)))
	}

	/// Encodes a selection as persisted text; `None` is the absence marker.
	pub fn encode(selection: &Selection) -> Option<String> {
		let persisted = Self::to_persisted(selection)?;
		match persisted.to_text() {
			Ok(text) => Some(text),
			Err(err) => {
				warn!(error = %err, "failed to serialize selection");
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn full() -> Selection {
		Selection::new(
			Some(SelectOption::new("E1", "Exp One")),
			Some(SelectOption::new("1", "Original")),
		)
	}

	#[test]
	fn full_selection_survives_encode_decode() {
		let selection = full();
		let text = ValueCodec::encode(&selection).unwrap();
		assert_eq!(ValueCodec::decode(Some(&text)), selection);
	}

	#[test]
	fn encode_matches_host_format() {
		assert_eq!(
			ValueCodec::encode(&full()).as_deref(),
			Some(r#"["E1","1",{"experiment":{"id":"E1","name":"Exp One"},"variant":{"id":"1","name":"Original"}}]"#)
		);
	}

	#[test]
	fn partial_selection_encodes_to_absence() {
		let experiment_only = Selection::new(Some(SelectOption::new("E1", "Exp One")), None);
		let variant_only = Selection::new(None, Some(SelectOption::new("0", "Control")));
		assert_eq!(ValueCodec::encode(&experiment_only), None);
		assert_eq!(ValueCodec::encode(&variant_only), None);
		assert_eq!(ValueCodec::encode(&Selection::default()), None);
	}

	#[test]
	fn decode_ignores_leading_elements() {
		let text = r#"["stale","9",{"experiment":{"id":"E1","name":"Exp One"},"variant":{"id":"0","name":"Control"}}]"#;
		let selection = ValueCodec::decode(Some(text));
		assert_eq!(selection.experiment, Some(SelectOption::new("E1", "Exp One")));
		assert_eq!(selection.variant, Some(SelectOption::new("0", "Control")));
	}

	#[test]
	fn decode_keeps_partial_snapshot() {
		let text = r#"["E1","",{"experiment":{"id":"E1","name":"Exp One"},"variant":null}]"#;
		let selection = ValueCodec::decode(Some(text));
		assert_eq!(selection.experiment, Some(SelectOption::new("E1", "Exp One")));
		assert_eq!(selection.variant, None);
	}

	#[test]
	fn malformed_or_absent_value_is_empty_selection() {
		assert!(ValueCodec::decode(None).is_empty());
		assert!(ValueCodec::decode(Some("")).is_empty());
		assert!(ValueCodec::decode(Some("null")).is_empty());
		assert!(ValueCodec::decode(Some("{oops")).is_empty());
		assert!(ValueCodec::decode(Some(r#"{"experiment":{"id":"E1"}}"#)).is_empty());
		assert!(ValueCodec::decode(Some(r#"["E1","0",{"experiment":42}]"#)).is_empty());
	}
}
