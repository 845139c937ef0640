//! Per-field configuration supplied by the host.

use serde::{Deserialize, Serialize};

/// Discovery document used to initialise the analytics client.
pub const ANALYTICS_DISCOVERY_DOC: &str =
	"https://content.googleapis.com/discovery/v1/apis/analytics/v3/rest";

/// OAuth scope requested at sign-in.
pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

/// API root the listing paths are resolved against.
pub const ANALYTICS_API_ROOT: &str = "https://www.googleapis.com";

/// Host-provided widget configuration.
///
/// Every key is optional on the wire; missing keys deserialize to empty
/// strings and are reported by [`missing_fields`](Self::missing_fields).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
	#[serde(default)]
	pub client_id: String,
	#[serde(default)]
	pub account_id: String,
	#[serde(default)]
	pub web_property_id: String,
	#[serde(default)]
	pub profile_id: String,
}

impl WidgetConfig {
	/// Returns the camelCase names of empty configuration keys.
	pub fn missing_fields(&self) -> Vec<&'static str> {
		[
			("clientId", &self.client_id),
			("accountId", &self.account_id),
			("webPropertyId", &self.web_property_id),
			("profileId", &self.profile_id),
		]
		.into_iter()
		.filter(|(_, value)| value.trim().is_empty())
		.map(|(name, _)| name)
		.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_keys_default_to_empty() {
		let config: WidgetConfig = serde_json::from_str(r#"{"clientId": "abc", "accountId": "1"}"#).unwrap();
		assert_eq!(config.client_id, "abc");
		assert_eq!(config.missing_fields(), vec!["webPropertyId", "profileId"]);
	}

	#[test]
	fn complete_config_has_no_missing_fields() {
		let config = WidgetConfig {
			client_id: "c".into(),
			account_id: "a".into(),
			web_property_id: "w".into(),
			profile_id: "p".into(),
		};
		assert!(config.missing_fields().is_empty());
	}
}
