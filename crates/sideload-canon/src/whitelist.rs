//! Per-token whitelist of the entries that make up a dta folder.

use std::fmt;

use crate::error::CanonicalizationError;

/// What an entry is, independent of the token it is named after.
///
/// Variant order is the whitelist order. For the conventional tokens it
/// matches a plain lexicographic sort of the names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryRole {
    CombinedHtml,
    CombinedPng,
    CombinedTxt,
    VennDiagram,
    DtaFolder,
}

impl EntryRole {
    pub const ALL: [Self; 5] = [
        Self::CombinedHtml,
        Self::CombinedPng,
        Self::CombinedTxt,
        Self::VennDiagram,
        Self::DtaFolder,
    ];

    /// Entry name for this role under `token`.
    #[must_use]
    pub fn file_name(self, token: &DtaName) -> String {
        let token = token.as_str();
        match self {
            Self::CombinedHtml => format!("combined_{token}.html"),
            Self::CombinedPng => format!("combined_{token}.png"),
            Self::CombinedTxt => format!("combined_{token}.txt"),
            Self::VennDiagram => format!("combined_{token}.vennDiagram.png"),
            Self::DtaFolder => token.to_string(),
        }
    }

    /// Whether the entry is a text file that may reference the token.
    #[must_use]
    pub const fn is_linked_text(self) -> bool {
        matches!(self, Self::CombinedHtml | Self::CombinedTxt)
    }
}

/// A validated dta-name token, e.g. `dta` or `dta_HL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DtaName(String);

impl DtaName {
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::InvalidDtaName`] if the token cannot
    /// name a single directory entry.
    pub fn new(raw: impl Into<String>) -> Result<Self, CanonicalizationError> {
        let name = raw.into();
        let reason = if name.is_empty() {
            Some("empty")
        } else if name == "." || name == ".." {
            Some("relative path component")
        } else if name.contains(['/', '\\']) {
            Some("contains a path separator")
        } else if name.contains('\0') {
            Some("contains a NUL byte")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CanonicalizationError::InvalidDtaName { name, reason }),
            None => Ok(Self(name)),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DtaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistEntry {
    pub role: EntryRole,
    pub name: String,
}

/// The five entries kept from a source folder, in role order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitelist {
    token: DtaName,
    entries: Vec<WhitelistEntry>,
}

impl Whitelist {
    #[must_use]
    pub fn for_token(token: &DtaName) -> Self {
        let entries = EntryRole::ALL
            .into_iter()
            .map(|role| WhitelistEntry {
                role,
                name: role.file_name(token),
            })
            .collect();
        Self {
            token: token.clone(),
            entries,
        }
    }

    #[must_use]
    pub const fn token(&self) -> &DtaName {
        &self.token
    }

    #[must_use]
    pub fn entries(&self) -> &[WhitelistEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|candidate| candidate == name)
    }

    /// Name of the entry with `role`.
    #[must_use]
    pub fn name_of(&self, role: EntryRole) -> &str {
        &self.entries[role as usize].name
    }

    /// Pair entries index by index with `target`'s.
    pub fn pair_with<'a>(
        &'a self,
        target: &'a Self,
    ) -> impl Iterator<Item = (&'a WhitelistEntry, &'a WhitelistEntry)> {
        self.entries.iter().zip(target.entries.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn whitelist(token: &str) -> Whitelist {
        Whitelist::for_token(&DtaName::new(token).unwrap())
    }

    #[test]
    fn conventional_tokens_are_already_sorted() {
        for token in ["dta", "dta_HL"] {
            let wl = whitelist(token);
            let names: Vec<&str> = wl.names().collect();
            let mut sorted = names.clone();
            sorted.sort_unstable();
            assert_eq!(names, sorted);
        }
    }

    #[test]
    fn dta_pairs_with_dta_hl() {
        let source = whitelist("dta");
        let target = whitelist("dta_HL");

        let pairs: Vec<(&str, &str)> = source
            .pair_with(&target)
            .map(|(from, to)| (from.name.as_str(), to.name.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("combined_dta.html", "combined_dta_HL.html"),
                ("combined_dta.png", "combined_dta_HL.png"),
                ("combined_dta.txt", "combined_dta_HL.txt"),
                (
                    "combined_dta.vennDiagram.png",
                    "combined_dta_HL.vennDiagram.png"
                ),
                ("dta", "dta_HL"),
            ]
        );
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("a/b")]
    #[case("a\\b")]
    fn rejects_tokens_that_are_not_single_entries(#[case] token: &str) {
        assert!(matches!(
            DtaName::new(token),
            Err(CanonicalizationError::InvalidDtaName { .. })
        ));
    }

    proptest! {
        #[test]
        fn pairing_preserves_roles(
            source in "[A-Za-z0-9_.-]{1,12}",
            target in "[A-Za-z0-9_.-]{1,12}",
        ) {
            prop_assume!(source != "." && source != "..");
            prop_assume!(target != "." && target != "..");
            let source = whitelist(&source);
            let target = whitelist(&target);

            let pairs: Vec<_> = source.pair_with(&target).collect();

            prop_assert_eq!(pairs.len(), EntryRole::ALL.len());
            for (from, to) in &pairs {
                prop_assert_eq!(from.role, to.role);
                prop_assert_eq!(&to.role.file_name(target.token()), &to.name);
            }
            let mut targets: Vec<&str> = pairs.iter().map(|(_, to)| to.name.as_str()).collect();
            targets.sort_unstable();
            targets.dedup();
            prop_assert_eq!(targets.len(), EntryRole::ALL.len());
        }
    }
}
