//! # sideload-ingest
//!
//! Turns an input table into payload-ready datasets:
//! - [`table`] reads the CSV layout (data columns, then folder-path columns)
//! - [`foreign_key`] decides which headers name remote entities
//! - [`resolver`] maps those names to server identifiers, once per run
//! - [`normalizer`] applies the resolutions and nests dotted headers

pub mod foreign_key;
pub mod normalizer;
pub mod resolver;
pub mod table;

mod error;

pub use error::{RecordError, ResolutionError, TableError};
pub use foreign_key::ForeignKeyConvention;
pub use normalizer::RecordNormalizer;
pub use resolver::{IdentifierResolver, ResolutionPlan};
pub use table::Table;

use sideload_client::EntityApi;
use sideload_core::NormalizedDataset;

/// Resolve every foreign-key column of `table` against `api` and normalize
/// all of its rows.
///
/// Returns one outcome per record, in table order. A record using a name
/// that could not be looked up or created is returned as a [`RecordError`];
/// the remaining records are still normalized.
pub async fn prepare_datasets<A: EntityApi>(
    table: &Table,
    convention: &ForeignKeyConvention,
    api: &A,
) -> Vec<Result<NormalizedDataset, RecordError>> {
    let mut resolver = IdentifierResolver::new(api);
    let plan = ResolutionPlan::build(table, convention, &mut resolver).await;
    tracing::info!(
        lookups = resolver.collections_fetched(),
        created = resolver.entities_created(),
        failed = plan.failures(),
        "resolved foreign-key columns"
    );

    let outcomes = RecordNormalizer::new(&plan).normalize_all(table);
    for error in outcomes.iter().filter_map(|outcome| outcome.as_ref().err()) {
        tracing::warn!(record = error.record, name = ?error.name, %error, "record rejected");
    }
    outcomes
}
