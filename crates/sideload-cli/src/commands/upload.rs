use sideload_ingest::{ForeignKeyConvention, prepare_datasets};

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::UploadArgs;
use crate::commands::read_table;
use crate::orchestrator::UploadOrchestrator;
use crate::output::output;
use crate::progress::Progress;

pub async fn handle(args: &UploadArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags)?;
    let table = read_table(&args.table, &config)?;
    let client = bootstrap::connect(&config).await?;

    let convention = ForeignKeyConvention::from(&config.foreign_keys);
    let spinner = Progress::spinner("resolving foreign-key columns");
    let records = prepare_datasets(&table, &convention, &client).await;
    spinner.clear();

    let report = UploadOrchestrator::new(&client, &config.canonical, config.replicate.anchor)
        .process(&records)
        .await;

    output(&report, flags.format)
}
