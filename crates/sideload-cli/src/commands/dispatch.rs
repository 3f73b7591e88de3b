use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Upload(args) => commands::upload::handle(&args, flags).await,
        Commands::Preview(args) => commands::preview::handle(&args, flags),
        Commands::Seed(args) => commands::seed::handle(&args, flags).await,
    }
}
