//! Raw record → payload-ready dataset.

use std::path::PathBuf;

use sideload_core::dataset::NAME_KEY;
use sideload_core::{CellValue, NormalizedDataset, PayloadNode, TabularRecord, flatten};

use crate::error::{RecordError, ResolutionError};
use crate::resolver::ResolutionPlan;
use crate::table::Table;

/// Applies a [`ResolutionPlan`], prunes blanks, and nests dotted headers.
pub struct RecordNormalizer<'a> {
    plan: &'a ResolutionPlan,
}

impl<'a> RecordNormalizer<'a> {
    #[must_use]
    pub const fn new(plan: &'a ResolutionPlan) -> Self {
        Self { plan }
    }

    /// Normalize one record.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::Unplanned`] if a foreign-key name is not
    /// covered by the plan.
    pub fn normalize(&self, record: &TabularRecord) -> Result<NormalizedDataset, ResolutionError> {
        let entries = record
            .fields
            .iter()
            .map(|(header, cell)| {
                let cell = self.plan.apply(header, cell.clone())?;
                Ok((header.clone(), PayloadNode::Leaf(cell)))
            })
            .collect::<Result<Vec<_>, ResolutionError>>()?;

        Ok(NormalizedDataset {
            data: flatten(entries),
            paths: record.paths.iter().map(PathBuf::from).collect(),
        })
    }

    /// Zip `headers` with a raw row and normalize it.
    ///
    /// # Errors
    ///
    /// See [`Self::normalize`].
    pub fn normalize_row(
        &self,
        headers: &[String],
        row: Vec<CellValue>,
    ) -> Result<NormalizedDataset, ResolutionError> {
        self.normalize(&TabularRecord::from_row(headers, row))
    }

    /// Normalize every record of `table`, in order, one outcome per record.
    ///
    /// A record that fails keeps its name and folders in the [`RecordError`]
    /// so the caller can report it; the other records are unaffected.
    #[must_use]
    pub fn normalize_all(&self, table: &Table) -> Vec<Result<NormalizedDataset, RecordError>> {
        table
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                self.normalize(record).map_err(|source| RecordError {
                    record: index + 1,
                    name: record
                        .get(NAME_KEY)
                        .filter(|cell| !cell.is_blank())
                        .map(ToString::to_string),
                    paths: record.paths.iter().map(PathBuf::from).collect(),
                    source,
                })
            })
            .collect()
    }
}
