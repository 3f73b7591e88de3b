//! Canonical dta-name selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn default_ratio_column() -> String {
    String::from("ratio_numerator")
}

fn default_dta_by_ratio_numerator() -> BTreeMap<String, String> {
    BTreeMap::from([
        (String::from("H"), String::from("dta_HL")),
        (String::from("L"), String::from("dta")),
    ])
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CanonicalConfig {
    /// Payload field whose value selects the canonical dta-name.
    #[serde(default = "default_ratio_column")]
    pub ratio_column: String,

    /// Canonical dta-name per ratio numerator.
    #[serde(default = "default_dta_by_ratio_numerator")]
    pub dta_by_ratio_numerator: BTreeMap<String, String>,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        Self {
            ratio_column: default_ratio_column(),
            dta_by_ratio_numerator: default_dta_by_ratio_numerator(),
        }
    }
}

impl CanonicalConfig {
    #[must_use]
    pub fn target_for(&self, ratio_numerator: &str) -> Option<&str> {
        self.dta_by_ratio_numerator
            .get(ratio_numerator.trim())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets() {
        let config = CanonicalConfig::default();
        assert_eq!(config.target_for("H"), Some("dta_HL"));
        assert_eq!(config.target_for(" L "), Some("dta"));
        assert_eq!(config.target_for("M"), None);
    }
}
