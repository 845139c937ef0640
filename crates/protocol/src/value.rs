//! Persisted field value.
//!
//! The host stores a field as the JSON text of a 3-element array:
//!
//! ```json
//! ["E1", "1", {"experiment": {"id": "E1", "name": "Exp One"}, "variant": {"id": "1", "name": "Original"}}]
//! ```
//!
//! The first two elements are derived copies kept for consumers that only
//! read ids. The last element is the [`StructuredValue`] and is the only part
//! read back.

use serde::{Deserialize, Serialize};

/// An `{id, name}` pair inside a [`StructuredValue`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
	pub id: String,
	#[serde(default, deserialize_with = "crate::listing::null_as_empty")]
	pub name: String,
}

impl NamedRef {
	pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
		}
	}
}

/// Display snapshot of a selection, readable without the remote catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredValue {
	#[serde(default)]
	pub experiment: Option<NamedRef>,
	#[serde(default)]
	pub variant: Option<NamedRef>,
}

/// `(experiment id, variant index, snapshot)` as stored by the host.
///
/// Serializes as a JSON array. Absence of a value is represented by the host
/// storing nothing at all, never by an empty array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedValue(pub String, pub String, pub StructuredValue);

impl PersistedValue {
	pub fn new(experiment: NamedRef, variant: NamedRef) -> Self {
		Self(
			experiment.id.clone(),
			variant.id.clone(),
			StructuredValue {
				experiment: Some(experiment),
				variant: Some(variant),
			},
		)
	}

	pub fn snapshot(&self) -> &StructuredValue {
		&self.2
	}

	/// Serializes to the host's text representation.
	pub fn to_text(&self) -> serde_json::Result<String> {
		serde_json::to_string(self)
	}
}

/// Reads the structured snapshot out of persisted text.
///
/// Only the last array element is inspected, so older values with a
/// different number of leading elements still load. `null`, an empty array,
/// or a `null` last element all mean "no selection".
pub fn snapshot_from_text(text: &str) -> serde_json::Result<Option<StructuredValue>> {
	let elements: Option<Vec<serde_json::Value>> = serde_json::from_str(text)?;
	match elements.and_then(|mut items| items.pop()) {
		None | Some(serde_json::Value::Null) => Ok(None),
		Some(last) => serde_json::from_value(last).map(Some),
	}
}
