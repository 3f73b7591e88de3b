use std::path::PathBuf;

use serde::Serialize;
use sideload_canon::target_dta_name;
use sideload_config::CanonicalConfig;
use sideload_core::{NormalizedDataset, PayloadMap};
use sideload_ingest::{ForeignKeyConvention, RecordNormalizer, ResolutionPlan};

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::PreviewArgs;
use crate::commands::read_table;
use crate::output::output;

#[derive(Debug, Serialize)]
struct PreviewEntry {
    data: PayloadMap,
    paths: Vec<PathBuf>,
    /// Token the folders would be renamed to, if it can be determined.
    dta_name: Option<String>,
}

impl PreviewEntry {
    fn new(dataset: NormalizedDataset, canonical: &CanonicalConfig) -> Self {
        let dta_name = target_dta_name(canonical, &dataset)
            .ok()
            .map(str::to_string);
        Self {
            data: dataset.data,
            paths: dataset.paths,
            dta_name,
        }
    }
}

/// Normalize the table offline; foreign-key names stay unresolved.
pub fn handle(args: &PreviewArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags)?;
    let table = read_table(&args.table, &config)?;

    let convention = ForeignKeyConvention::from(&config.foreign_keys);
    let plan = ResolutionPlan::offline(&table, &convention);
    let entries = RecordNormalizer::new(&plan)
        .normalize_all(&table)
        .into_iter()
        .map(|record| record.map(|dataset| PreviewEntry::new(dataset, &config.canonical)))
        .collect::<Result<Vec<_>, _>>()?;

    output(&entries, flags.format)
}
