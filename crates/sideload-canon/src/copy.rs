//! Whitelist-filtered directory copy.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{CanonicalizationError, io_at};
use crate::whitelist::Whitelist;

/// Copy the whitelisted top-level entries of `source` into `dest`.
///
/// Everything below a whitelisted directory is copied as-is. Symlinks are
/// not followed.
///
/// # Errors
///
/// Returns [`CanonicalizationError::MissingEntry`] before copying anything if
/// a whitelisted entry is absent from `source`.
pub fn copy_whitelisted(
    source: &Path,
    dest: &Path,
    whitelist: &Whitelist,
) -> Result<u64, CanonicalizationError> {
    if !source.is_dir() {
        return Err(CanonicalizationError::SourceNotDirectory {
            path: source.to_path_buf(),
        });
    }

    for name in whitelist.names() {
        let path = source.join(name);
        if fs::symlink_metadata(&path).is_err() {
            return Err(CanonicalizationError::MissingEntry { path });
        }
    }

    fs::create_dir_all(dest).map_err(io_at(dest))?;

    let mut files = 0;
    for name in whitelist.names() {
        files += copy_tree(&source.join(name), &dest.join(name))?;
    }

    tracing::debug!(
        source = %source.display(),
        dest = %dest.display(),
        files,
        "copied whitelisted entries"
    );
    Ok(files)
}

/// Copy a file or directory tree. Returns the number of files copied.
fn copy_tree(from: &Path, to: &Path) -> Result<u64, CanonicalizationError> {
    let mut files = 0;
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = if relative.as_os_str().is_empty() {
            to.to_path_buf()
        } else {
            to.join(relative)
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(io_at(&target))?;
        } else if file_type.is_symlink() {
            copy_link(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(io_at(entry.path()))?;
            files += 1;
        }
    }
    Ok(files)
}

#[cfg(unix)]
fn copy_link(link: &Path, target: &Path) -> Result<(), CanonicalizationError> {
    let points_to = fs::read_link(link).map_err(io_at(link))?;
    std::os::unix::fs::symlink(&points_to, target).map_err(io_at(target))
}

#[cfg(not(unix))]
fn copy_link(link: &Path, _target: &Path) -> Result<(), CanonicalizationError> {
    tracing::warn!(path = %link.display(), "skipping symlink");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whitelist::DtaName;
    use pretty_assertions::assert_eq;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, path.display().to_string()).unwrap();
    }

    #[test]
    fn missing_entry_fails_before_copying() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::create_dir(source.path().join("dta")).unwrap();
        touch(&source.path().join("combined_dta.html"));

        let whitelist = Whitelist::for_token(&DtaName::new("dta").unwrap());
        let err = copy_whitelisted(source.path(), &dest.path().join("out"), &whitelist)
            .unwrap_err();

        assert!(matches!(err, CanonicalizationError::MissingEntry { ref path }
            if path.ends_with("combined_dta.png")));
        assert!(!dest.path().join("out").exists());
    }

    #[test]
    fn source_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        touch(&file);

        let whitelist = Whitelist::for_token(&DtaName::new("dta").unwrap());
        let err = copy_whitelisted(&file, &dir.path().join("out"), &whitelist).unwrap_err();

        assert!(matches!(err, CanonicalizationError::SourceNotDirectory { .. }));
    }

    #[test]
    fn counts_copied_files() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let whitelist = Whitelist::for_token(&DtaName::new("dta").unwrap());
        for name in whitelist.names().filter(|name| *name != "dta") {
            touch(&source.path().join(name));
        }
        touch(&source.path().join("dta/a.dta"));
        touch(&source.path().join("dta/sub/b.dta"));

        let files = copy_whitelisted(source.path(), dest.path(), &whitelist).unwrap();

        assert_eq!(files, 6);
        assert!(dest.path().join("dta/sub/b.dta").is_file());
    }
}
