//! Input table layout.

use serde::{Deserialize, Serialize};

/// Description rows above the header in the dataset sideload template.
pub const TEMPLATE_DESCRIPTION_ROWS: usize = 1;

const fn default_skip_rows() -> usize {
    TEMPLATE_DESCRIPTION_ROWS
}

fn default_path_column() -> String {
    String::from("path")
}

fn default_name_column() -> String {
    String::from("name")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TableConfig {
    /// Leading rows to skip before the header row. Defaults to the template's
    /// single description row; set 0 for exports that start with the header.
    #[serde(default = "default_skip_rows")]
    pub skip_rows: usize,

    /// Header of the first folder-path column. It and every column after it
    /// hold folder paths; the columns before it are data.
    #[serde(default = "default_path_column")]
    pub path_column: String,

    /// Header of the dataset name column.
    #[serde(default = "default_name_column")]
    pub name_column: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            skip_rows: default_skip_rows(),
            path_column: default_path_column(),
            name_column: default_name_column(),
        }
    }
}

impl TableConfig {
    /// Layout of a table whose first row is the header.
    #[must_use]
    pub fn header_first() -> Self {
        Self {
            skip_rows: 0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_skips_the_template_description_row() {
        assert_eq!(TableConfig::default().skip_rows, 1);
        assert_eq!(TableConfig::header_first().skip_rows, 0);
        assert_eq!(TableConfig::header_first().path_column, "path");
    }
}
