//! Scalar cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single scalar value from a tabular row.
///
/// Table cells are always read as [`CellValue::Text`]. [`CellValue::Integer`]
/// appears once a foreign-key name has been replaced by its server-assigned
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Text(String),
    Blank,
}

impl CellValue {
    /// Build a cell from raw text. Whitespace-only text becomes [`CellValue::Blank`].
    #[must_use]
    pub fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Self::Blank
        } else {
            Self::Text(raw.to_string())
        }
    }

    /// Blank cells carry no meaning and are pruned from payloads.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Blank => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Integer(_) => false,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Interpret the cell as an already-resolved identifier.
    ///
    /// Integers are returned as-is; text qualifies only when it is a pure
    /// (optionally signed) integer after trimming.
    #[must_use]
    pub fn as_identifier(&self) -> Option<i64> {
        match self {
            Self::Integer(id) => Some(*id),
            Self::Text(text) => text.trim().parse::<i64>().ok(),
            Self::Blank => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(id) => write!(f, "{id}"),
            Self::Text(text) => f.write_str(text),
            Self::Blank => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::from_text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}
