//! Tabular records and the normalized datasets built from them.

use std::path::PathBuf;

use serde::Serialize;

use crate::cell::CellValue;
use crate::errors::CoreError;
use crate::payload::{PayloadMap, PayloadNode};

/// Payload key holding the dataset's display name.
pub const NAME_KEY: &str = "name";

/// Payload key linking a replicate upload to its first upload.
pub const REPLICATE_OF_KEY: &str = "replicate_of";

/// One row of the input table.
///
/// `fields` keeps header order; `paths` holds the trailing folder cells with
/// blanks removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularRecord {
    pub fields: Vec<(String, CellValue)>,
    pub paths: Vec<String>,
}

impl TabularRecord {
    /// Zip `headers` with the leading cells of `row`; every cell past the
    /// headers is a folder path.
    ///
    /// Rows shorter than the header list are padded with blanks.
    #[must_use]
    pub fn from_row(headers: &[String], row: Vec<CellValue>) -> Self {
        let mut cells = row.into_iter();

        let fields = headers
            .iter()
            .map(|header| (header.clone(), cells.next().unwrap_or(CellValue::Blank)))
            .collect();

        let paths = cells
            .filter(|cell| !cell.is_blank())
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        Self { fields, paths }
    }

    #[must_use]
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, cell)| cell)
    }
}

/// A payload-ready dataset and the folders to upload with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedDataset {
    pub data: PayloadMap,
    pub paths: Vec<PathBuf>,
}

impl NormalizedDataset {
    /// Top-level text leaf at `key`, if any.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(PayloadNode::as_leaf)
            .and_then(CellValue::as_text)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.text(NAME_KEY)
    }

    /// Dataset name, required for naming archives.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingField`] when the payload has no `name` text.
    pub fn require_name(&self) -> Result<&str, CoreError> {
        self.name().ok_or_else(|| CoreError::MissingField {
            field: NAME_KEY.to_string(),
        })
    }

    /// Copy of the payload with `replicate_of` set to `anchor`.
    #[must_use]
    pub fn payload_with_replicate_of(&self, anchor: i64) -> PayloadMap {
        let mut data = self.data.clone();
        data.insert(
            REPLICATE_OF_KEY.to_string(),
            PayloadNode::Leaf(CellValue::Integer(anchor)),
        );
        data
    }
}
