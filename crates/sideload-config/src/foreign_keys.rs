//! Foreign-key column conventions.

use serde::{Deserialize, Serialize};

fn default_suffix() -> String {
    String::from("_id")
}

fn default_columns() -> Vec<String> {
    [
        "organism",
        "experiment_type",
        "instrument",
        "treatment_type",
        "proteomic_fraction",
        "sample_type",
        "cell_type",
        "probe",
        "inhibitor",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Which headers name a remote entity instead of carrying a literal value.
///
/// A header is a foreign key when it ends with `suffix`, or when its last
/// dot-segment is listed in `columns`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForeignKeysConfig {
    /// Header suffix marking a foreign-key column. Empty disables the rule.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Entity names recognised without a suffix.
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
}

impl Default for ForeignKeysConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            columns: default_columns(),
        }
    }
}
