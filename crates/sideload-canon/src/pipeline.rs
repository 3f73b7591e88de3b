//! Copy, rename, relink.
//!
//! Each stage consumes the previous one, so a directory can only be
//! relinked after its entries were renamed, and only a fully processed
//! directory is handed out as a [`CanonicalDirectory`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::copy::copy_whitelisted;
use crate::error::{CanonicalizationError, io_at};
use crate::whitelist::{DtaName, Whitelist};

/// Whitelisted entries copied into the working directory, still under the
/// source token.
#[derive(Debug)]
pub struct Copied {
    root: PathBuf,
    whitelist: Whitelist,
}

/// Entries renamed to the target token; text references not yet rewritten.
#[derive(Debug)]
pub struct Renamed {
    root: PathBuf,
    from: DtaName,
    to: Whitelist,
}

/// A directory ready to archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalDirectory {
    root: PathBuf,
    dta_name: DtaName,
    renamed_from: Option<DtaName>,
}

impl Copied {
    /// # Errors
    ///
    /// See [`copy_whitelisted`].
    pub fn from_source(
        source_dir: &Path,
        dest_dir: &Path,
        source_dta: &DtaName,
    ) -> Result<Self, CanonicalizationError> {
        let whitelist = Whitelist::for_token(source_dta);
        copy_whitelisted(source_dir, dest_dir, &whitelist)?;
        Ok(Self {
            root: dest_dir.to_path_buf(),
            whitelist,
        })
    }

    /// Finish without renaming. Only valid when the source already uses the
    /// target token.
    #[must_use]
    pub fn into_canonical(self) -> CanonicalDirectory {
        CanonicalDirectory {
            root: self.root,
            dta_name: self.whitelist.token().clone(),
            renamed_from: None,
        }
    }

    /// Rename every whitelisted entry to its counterpart under `target`.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::RenameCollision`] if a target name is
    /// also a source name or already exists. Nothing is renamed in that case.
    pub fn rename(self, target: &DtaName) -> Result<Renamed, CanonicalizationError> {
        let to = Whitelist::for_token(target);

        for (_, target_entry) in self.whitelist.pair_with(&to) {
            let name = &target_entry.name;
            if self.whitelist.contains(name) || self.root.join(name).exists() {
                return Err(CanonicalizationError::RenameCollision { name: name.clone() });
            }
        }

        for (from, to) in self.whitelist.pair_with(&to) {
            let old = self.root.join(&from.name);
            let new = self.root.join(&to.name);
            fs::rename(&old, &new).map_err(io_at(&old))?;
            tracing::trace!(from = %from.name, to = %to.name, "renamed entry");
        }

        Ok(Renamed {
            root: self.root,
            from: self.whitelist.token().clone(),
            to,
        })
    }
}

impl Renamed {
    /// Replace every occurrence of the old token in the combined text and
    /// html files. Contents are treated as bytes, so files in any encoding
    /// are rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::LinkTargetMissing`] if one of those
    /// files is gone.
    pub fn relink(self) -> Result<CanonicalDirectory, CanonicalizationError> {
        let old = self.from.as_str();
        let new = self.to.token().as_str();

        for entry in self.to.entries().iter().filter(|e| e.role.is_linked_text()) {
            let path = self.root.join(&entry.name);
            if !path.is_file() {
                return Err(CanonicalizationError::LinkTargetMissing { path });
            }
            let contents = fs::read(&path).map_err(io_at(&path))?;
            let (rewritten, occurrences) = replace_bytes(&contents, old.as_bytes(), new.as_bytes());
            if occurrences > 0 {
                fs::write(&path, rewritten).map_err(io_at(&path))?;
            }
            tracing::debug!(file = %entry.name, occurrences, "rewrote references");
        }

        Ok(CanonicalDirectory {
            root: self.root,
            dta_name: self.to.token().clone(),
            renamed_from: Some(self.from),
        })
    }
}

/// Copy of `haystack` with every non-overlapping `from` replaced by `to`,
/// and the number of replacements.
fn replace_bytes(haystack: &[u8], from: &[u8], to: &[u8]) -> (Vec<u8>, usize) {
    if from.is_empty() {
        return (haystack.to_vec(), 0);
    }

    let mut out = Vec::with_capacity(haystack.len());
    let mut occurrences = 0;
    let mut rest = haystack;
    while !rest.is_empty() {
        if rest.starts_with(from) {
            out.extend_from_slice(to);
            rest = &rest[from.len()..];
            occurrences += 1;
        } else {
            out.push(rest[0]);
            rest = &rest[1..];
        }
    }
    (out, occurrences)
}

impl CanonicalDirectory {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn dta_name(&self) -> &DtaName {
        &self.dta_name
    }

    /// Source token, if the entries were renamed.
    #[must_use]
    pub const fn renamed_from(&self) -> Option<&DtaName> {
        self.renamed_from.as_ref()
    }
}

/// Produce a canonical copy of `source_dir` in `dest_dir`.
///
/// # Errors
///
/// Any [`CanonicalizationError`]; the folder cannot be uploaded.
pub fn canonicalize(
    source_dir: &Path,
    dest_dir: &Path,
    source_dta: &str,
    target_dta: &str,
) -> Result<CanonicalDirectory, CanonicalizationError> {
    let source = DtaName::new(source_dta)?;
    let target = DtaName::new(target_dta)?;

    let copied = Copied::from_source(source_dir, dest_dir, &source)?;
    if source == target {
        return Ok(copied.into_canonical());
    }
    copied.rename(&target)?.relink()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture(token: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let whitelist = Whitelist::for_token(&DtaName::new(token).unwrap());
        for entry in whitelist.entries() {
            let path = dir.path().join(&entry.name);
            if entry.role == crate::whitelist::EntryRole::DtaFolder {
                fs::create_dir(&path).unwrap();
            } else {
                fs::write(&path, format!("see {token}/")).unwrap();
            }
        }
        dir
    }

    #[test]
    fn same_token_skips_rename() {
        let source = fixture("dta_HL");
        let work = tempfile::tempdir().unwrap();
        let dest = work.path().join("out");

        let canonical = canonicalize(source.path(), &dest, "dta_HL", "dta_HL").unwrap();

        assert_eq!(canonical.dta_name().as_str(), "dta_HL");
        assert!(canonical.renamed_from().is_none());
        assert_eq!(
            fs::read_to_string(dest.join("combined_dta_HL.txt")).unwrap(),
            "see dta_HL/"
        );
    }

    #[test]
    fn relink_rewrites_files_that_are_not_utf8() {
        let source = fixture("dta");
        let latin1 = b"<p>R\xe9sultats: <a href=\"dta/a.out\">dta</a></p>";
        fs::write(source.path().join("combined_dta.html"), latin1).unwrap();
        let work = tempfile::tempdir().unwrap();
        let dest = work.path().join("out");

        canonicalize(source.path(), &dest, "dta", "dta_HL").unwrap();

        assert_eq!(
            fs::read(dest.join("combined_dta_HL.html")).unwrap(),
            b"<p>R\xe9sultats: <a href=\"dta_HL/a.out\">dta_HL</a></p>".to_vec()
        );
    }

    #[test]
    fn byte_replacement_counts_non_overlapping_matches() {
        assert_eq!(replace_bytes(b"aaa", b"aa", b"b"), (b"ba".to_vec(), 1));
        assert_eq!(replace_bytes(b"dta dta", b"dta", b"dta_HL"), (b"dta_HL dta_HL".to_vec(), 2));
        assert_eq!(replace_bytes(b"none", b"", b"x"), (b"none".to_vec(), 0));
    }

    #[test]
    fn relink_requires_text_files() {
        let source = fixture("dta");
        let work = tempfile::tempdir().unwrap();
        let dest = work.path().join("out");
        let renamed = Copied::from_source(source.path(), &dest, &DtaName::new("dta").unwrap())
            .unwrap()
            .rename(&DtaName::new("dta_HL").unwrap())
            .unwrap();
        fs::remove_file(dest.join("combined_dta_HL.html")).unwrap();

        let err = renamed.relink().unwrap_err();

        assert!(matches!(err, CanonicalizationError::LinkTargetMissing { ref path }
            if path.ends_with("combined_dta_HL.html")));
    }

    #[test]
    fn collision_leaves_entries_in_place() {
        let source = fixture("dta");
        let work = tempfile::tempdir().unwrap();
        let dest = work.path().join("out");
        let copied =
            Copied::from_source(source.path(), &dest, &DtaName::new("dta").unwrap()).unwrap();
        fs::create_dir(dest.join("dta_HL")).unwrap();

        let err = copied.rename(&DtaName::new("dta_HL").unwrap()).unwrap_err();

        assert!(matches!(err, CanonicalizationError::RenameCollision { ref name } if name == "dta_HL"));
        assert!(dest.join("combined_dta.txt").is_file());
    }

    #[test]
    fn invalid_target_is_rejected_before_copying() {
        let source = fixture("dta");
        let work = tempfile::tempdir().unwrap();
        let dest = work.path().join("out");

        let err = canonicalize(source.path(), &dest, "dta", "../dta").unwrap_err();

        assert!(matches!(err, CanonicalizationError::InvalidDtaName { .. }));
        assert!(!dest.exists());
    }
}
