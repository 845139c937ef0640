//! The element object the host passes to `CustomElement.init`.

use expsel::SelectorOptions;
use expsel::protocol::WidgetConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInit {
    /// Persisted text of the field; `null` or empty when unset.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub config: Option<WidgetConfig>,
}

impl ElementInit {
    pub fn into_options(self) -> SelectorOptions {
        let options = SelectorOptions::new(self.config.unwrap_or_default()).disabled(self.disabled);
        match self.value.filter(|value| !value.trim().is_empty()) {
            Some(value) => options.initial_value(value),
            None => options,
        }
    }
}
