//! Which token a folder is renamed to, and where it comes from.

use std::path::{Path, PathBuf};

use sideload_config::CanonicalConfig;
use sideload_core::NormalizedDataset;

use crate::error::CanonicalizationError;

/// Canonical dta-name for `dataset`, looked up from its ratio numerator.
///
/// # Errors
///
/// Returns [`CanonicalizationError::UnknownTarget`] if the numerator is
/// missing or has no configured token.
pub fn target_dta_name<'c>(
    config: &'c CanonicalConfig,
    dataset: &NormalizedDataset,
) -> Result<&'c str, CanonicalizationError> {
    let numerator = dataset
        .text(&config.ratio_column)
        .ok_or(CanonicalizationError::UnknownTarget { ratio: None })?;

    config
        .target_for(numerator)
        .ok_or_else(|| CanonicalizationError::UnknownTarget {
            ratio: Some(numerator.to_string()),
        })
}

/// Split a dta folder path into its parent directory and its token.
///
/// # Errors
///
/// Returns [`CanonicalizationError::InvalidDtaName`] if the path has no
/// final component.
pub fn split_dta_folder(folder: &Path) -> Result<(PathBuf, String), CanonicalizationError> {
    let token = folder
        .file_name()
        .ok_or_else(|| CanonicalizationError::InvalidDtaName {
            name: folder.display().to_string(),
            reason: "path has no final component",
        })?
        .to_string_lossy()
        .into_owned();

    let parent = match folder.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((parent, token))
}
