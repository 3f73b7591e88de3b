//! Directory canonicalization for sideload uploads.
//!
//! A dta folder and its `combined_*` siblings are copied into a scratch
//! directory, renamed to the canonical token, relinked, and zipped.

pub mod archive;
pub mod copy;
pub mod error;
pub mod pipeline;
pub mod target;
pub mod whitelist;

use std::path::{Path, PathBuf};

pub use archive::{archive_directory, archive_file_name};
pub use error::CanonicalizationError;
pub use pipeline::{CanonicalDirectory, Copied, Renamed, canonicalize};
pub use target::{split_dta_folder, target_dta_name};
pub use whitelist::{DtaName, EntryRole, Whitelist, WhitelistEntry};

/// Canonicalize `folder` under `work_dir` and zip it as `<dataset>.zip`.
///
/// Returns the archive path, inside `work_dir`.
///
/// # Errors
///
/// Any [`CanonicalizationError`] from splitting, canonicalizing or
/// archiving the folder.
pub fn prepare_archive(
    folder: &Path,
    work_dir: &Path,
    dataset: &str,
    target_dta: &str,
) -> Result<PathBuf, CanonicalizationError> {
    let (source_dir, source_dta) = split_dta_folder(folder)?;
    let canonical = canonicalize(
        &source_dir,
        &work_dir.join("canonical"),
        &source_dta,
        target_dta,
    )?;

    let zip_path = work_dir.join(archive_file_name(dataset));
    archive_directory(canonical.path(), &zip_path)?;

    tracing::info!(
        folder = %folder.display(),
        from = %source_dta,
        to = %canonical.dta_name(),
        archive = %zip_path.display(),
        "prepared archive"
    );
    Ok(zip_path)
}
