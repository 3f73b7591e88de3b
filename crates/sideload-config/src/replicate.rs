//! Replicate linkage policy.

use serde::{Deserialize, Serialize};

/// Which upload response may anchor the `replicate_of` link of a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicateAnchor {
    /// Only an accepted upload's identifier is captured.
    #[default]
    FirstSuccess,
    /// An identifier carried by a rejected upload's response is captured too.
    FirstResponse,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReplicateConfig {
    #[serde(default)]
    pub anchor: ReplicateAnchor,
}
