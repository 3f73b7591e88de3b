use anyhow::Context;
use sideload_client::seed::SeedPlan;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::SeedArgs;
use crate::output::output;

pub async fn handle(args: &SeedArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let plan = SeedPlan::from_path(&args.file)
        .with_context(|| format!("failed to read seed file {}", args.file.display()))?;

    let config = bootstrap::load_config(flags)?;
    let client = bootstrap::connect(&config).await?;

    let outcomes = client.seed(&plan).await;
    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    tracing::info!(items = outcomes.len(), failed, "seeding finished");

    output(&outcomes, flags.format)
}
