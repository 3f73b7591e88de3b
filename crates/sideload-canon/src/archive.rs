//! Zip archiving of canonical directories.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{CanonicalizationError, io_at};

/// Zip the contents of `dir` into `zip_path`.
///
/// Entry names are relative to `dir` and use `/` separators. Symlinks are
/// stored as symlink entries holding their target, never followed.
///
/// # Errors
///
/// Returns [`CanonicalizationError::Io`] or
/// [`CanonicalizationError::Archive`] if writing fails.
pub fn archive_directory(dir: &Path, zip_path: &Path) -> Result<PathBuf, CanonicalizationError> {
    let file = File::create(zip_path).map_err(io_at(zip_path))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0_usize;
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        let name = entry_name(relative);

        if entry.file_type().is_symlink() {
            let target = fs::read_link(entry.path()).map_err(io_at(entry.path()))?;
            zip.add_symlink(name, target.to_string_lossy(), options)?;
        } else if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else {
            zip.start_file(name, options)?;
            let mut source = File::open(entry.path()).map_err(io_at(entry.path()))?;
            io::copy(&mut source, &mut zip).map_err(io_at(entry.path()))?;
        }
        entries += 1;
    }

    zip.finish()?;
    tracing::debug!(archive = %zip_path.display(), entries, "wrote archive");
    Ok(zip_path.to_path_buf())
}

/// Archive file name for a dataset, safe to place in a flat directory.
#[must_use]
pub fn archive_file_name(dataset: &str) -> String {
    let stem: String = dataset
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    if stem.is_empty() || stem == "." || stem == ".." {
        "dataset.zip".to_string()
    } else {
        format!("{stem}.zip")
    }
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
