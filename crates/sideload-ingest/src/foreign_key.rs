//! Foreign-key column detection.

use std::collections::BTreeSet;

use sideload_config::ForeignKeysConfig;
use sideload_core::payload::KEY_SEPARATOR;

/// Decides which headers name remote entities, and at which endpoint.
///
/// A header is a foreign key when it ends with the configured suffix, or
/// when its last dot-segment is one of the configured column names. The
/// endpoint is the last dot-segment with the suffix removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyConvention {
    suffix: String,
    columns: BTreeSet<String>,
}

impl ForeignKeyConvention {
    #[must_use]
    pub fn new(suffix: impl Into<String>, columns: impl IntoIterator<Item = String>) -> Self {
        Self {
            suffix: suffix.into(),
            columns: columns.into_iter().collect(),
        }
    }

    /// Endpoint for `header`, or `None` if it is not a foreign key.
    #[must_use]
    pub fn endpoint_for(&self, header: &str) -> Option<String> {
        if !self.suffix.is_empty()
            && let Some(stripped) = header.strip_suffix(self.suffix.as_str())
        {
            let endpoint = last_segment(stripped);
            if !endpoint.is_empty() {
                return Some(endpoint.to_string());
            }
        }

        let last = last_segment(header);
        self.columns.contains(last).then(|| last.to_string())
    }

    #[must_use]
    pub fn is_foreign_key(&self, header: &str) -> bool {
        self.endpoint_for(header).is_some()
    }
}

impl From<&ForeignKeysConfig> for ForeignKeyConvention {
    fn from(config: &ForeignKeysConfig) -> Self {
        Self::new(config.suffix.clone(), config.columns.iter().cloned())
    }
}

fn last_segment(header: &str) -> &str {
    header.rsplit(KEY_SEPARATOR).next().unwrap_or(header)
}
