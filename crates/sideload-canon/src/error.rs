//! Canonicalization error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors canonicalizing or archiving one folder. Fatal for that folder only.
#[derive(Debug, Error)]
pub enum CanonicalizationError {
    #[error("invalid dta-name '{name}': {reason}")]
    InvalidDtaName { name: String, reason: &'static str },

    #[error("{path} is not a directory")]
    SourceNotDirectory { path: PathBuf },

    #[error("expected entry {path} does not exist")]
    MissingEntry { path: PathBuf },

    #[error("cannot rename to '{name}': an entry with that name already exists")]
    RenameCollision { name: String },

    #[error("link target {path} does not exist")]
    LinkTargetMissing { path: PathBuf },

    #[error("no canonical dta-name for ratio numerator {}", .ratio.as_deref().unwrap_or("(missing)"))]
    UnknownTarget { ratio: Option<String> },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Attach `path` to an I/O error.
pub(crate) fn io_at(path: &Path) -> impl FnOnce(std::io::Error) -> CanonicalizationError + '_ {
    move |source| CanonicalizationError::Io {
        path: path.to_path_buf(),
        source,
    }
}
