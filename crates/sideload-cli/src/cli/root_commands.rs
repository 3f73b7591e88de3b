use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Resolve, normalize and upload every dataset in a table.
    Upload(UploadArgs),
    /// Print the normalized payloads without contacting the service.
    Preview(PreviewArgs),
    /// Create entities from a JSON seed file.
    Seed(SeedArgs),
}

#[derive(Clone, Debug, Args)]
pub struct TableArgs {
    /// CSV table: data columns, then a `path` column and further folder paths.
    pub table: PathBuf,

    /// Leading rows to skip before the header row.
    #[arg(long)]
    pub skip_rows: Option<usize>,
}

#[derive(Clone, Debug, Args)]
pub struct UploadArgs {
    #[command(flatten)]
    pub table: TableArgs,
}

#[derive(Clone, Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub table: TableArgs,
}

#[derive(Clone, Debug, Args)]
pub struct SeedArgs {
    /// JSON file mapping plural collection names to item lists.
    pub file: PathBuf,
}
