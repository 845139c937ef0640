//! Remote experiment listing envelope.
//!
//! The analytics management API answers a listing request with either an
//! `items` array or an `error` object. Only the fields the selector needs are
//! modelled; everything else in the payload is ignored.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::WidgetConfig;

/// Error code the listing service uses for expired or missing credentials.
pub const UNAUTHORIZED: i64 = 401;

/// A named option within an experiment, identified by its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
	#[serde(default, deserialize_with = "null_as_empty")]
	pub name: String,
}

impl Variation {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

/// A remote experiment with its ordered variations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
	pub id: String,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub name: String,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub variations: Vec<Variation>,
}

/// Reads an absent or `null` field as its empty value.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `error` object of a failed listing call.
///
/// `code` is 0 when the envelope carries no usable code. The browser client
/// reports network failures with negative codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingError {
	pub code: i64,
	pub message: String,
}

impl ListingError {
	pub fn is_unauthorized(&self) -> bool {
		self.code == UNAUTHORIZED
	}

	/// Reads whatever the service put under `error`: an object with `code`
	/// and `message`, or a bare message string.
	fn from_value(value: &Value) -> Self {
		let code = match value.get("code") {
			Some(Value::Number(number)) => number.as_i64(),
			Some(Value::String(text)) => text.trim().parse().ok(),
			_ => None,
		};
		let message = match value {
			Value::String(text) => Some(text.as_str()),
			other => other.get("message").and_then(Value::as_str),
		};
		Self {
			code: code.unwrap_or_default(),
			message: message.unwrap_or_default().to_owned(),
		}
	}
}

/// Response body of the experiment listing call.
///
/// Any body carrying a non-null `error` is a [`Failure`](Self::Failure),
/// whatever else it contains. A body without `items` is an empty listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ListingResponse {
	/// The service rejected the call.
	Failure { error: ListingError },
	/// Experiments for the requested profile, in service order.
	Listing { items: Vec<Experiment> },
}

impl ListingResponse {
	pub fn items(items: Vec<Experiment>) -> Self {
		Self::Listing { items }
	}

	pub fn error(code: i64, message: impl Into<String>) -> Self {
		Self::Failure {
			error: ListingError {
				code,
				message: message.into(),
			},
		}
	}
}

impl<'de> Deserialize<'de> for ListingResponse {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		struct Envelope {
			#[serde(default)]
			error: Option<Value>,
			#[serde(default)]
			items: Option<Value>,
		}

		let envelope = Envelope::deserialize(deserializer)?;
		if let Some(error) = envelope.error {
			return Ok(Self::Failure {
				error: ListingError::from_value(&error),
			});
		}
		let items = match envelope.items {
			Some(items) => Vec::<Experiment>::deserialize(items).map_err(de::Error::custom)?,
			None => Vec::new(),
		};
		Ok(Self::Listing { items })
	}
}

/// Account / property / profile triple addressing one listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingPath {
	pub account_id: String,
	pub web_property_id: String,
	pub profile_id: String,
}

impl ListingPath {
	pub fn new(
		account_id: impl Into<String>,
		web_property_id: impl Into<String>,
		profile_id: impl Into<String>,
	) -> Self {
		Self {
			account_id: account_id.into(),
			web_property_id: web_property_id.into(),
			profile_id: profile_id.into(),
		}
	}

	pub fn from_config(config: &WidgetConfig) -> Self {
		Self::new(
			config.account_id.clone(),
			config.web_property_id.clone(),
			config.profile_id.clone(),
		)
	}
}

impl fmt::Display for ListingPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"/analytics/v3/management/accounts/{}/webproperties/{}/profiles/{}/experiments",
			self.account_id, self.web_property_id, self.profile_id
		)
	}
}
