//! Cross-cutting error types for sideload.
//!
//! Domain-specific errors (`ClientError`, `ResolutionError`,
//! `CanonicalizationError`) live in their respective crates. The binary
//! converges them through `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A payload is missing a field the pipeline depends on.
    #[error("Dataset is missing required field '{field}'")]
    MissingField { field: String },
}
