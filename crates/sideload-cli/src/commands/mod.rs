pub mod dispatch;
pub mod preview;
pub mod seed;
pub mod upload;

use anyhow::Context;
use sideload_config::SideloadConfig;
use sideload_ingest::Table;

use crate::cli::root_commands::TableArgs;

/// Read the input table with `--skip-rows` applied over `[table]`.
pub fn read_table(args: &TableArgs, config: &SideloadConfig) -> anyhow::Result<Table> {
    let mut table_config = config.table.clone();
    if let Some(skip_rows) = args.skip_rows {
        table_config.skip_rows = skip_rows;
    }

    Table::read_csv(&args.table, &table_config)
        .with_context(|| format!("failed to read table {}", args.table.display()))
}
