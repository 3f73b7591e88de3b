//! CSV table ingestion.
//!
//! Layout: `skip_rows` free-form rows, then one header row. Every column
//! before the `path` header is a data column; the `path` column and
//! everything after it hold folder paths, one per replicate.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use sideload_config::TableConfig;
use sideload_core::{CellValue, TabularRecord};

use crate::error::TableError;

/// A validated input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Data headers in column order.
    pub headers: Vec<String>,
    pub records: Vec<TabularRecord>,
}

impl Table {
    /// Read a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if the file cannot be read or fails layout
    /// validation.
    pub fn read_csv(path: &Path, config: &TableConfig) -> Result<Self, TableError> {
        let file = std::fs::File::open(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, config)
    }

    /// Read CSV from any reader.
    ///
    /// # Errors
    ///
    /// See [`Self::read_csv`].
    pub fn from_reader<R: Read>(reader: R, config: &TableConfig) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = csv_reader.records().skip(config.skip_rows);

        let header_row = rows.next().ok_or(TableError::Empty)??;
        let headers = data_headers(&header_row, config)?;

        let mut records = Vec::new();
        for row in rows {
            let row = row?;
            let cells: Vec<CellValue> = row.iter().map(CellValue::from_text).collect();
            if cells.iter().all(CellValue::is_blank) {
                continue;
            }
            records.push(TabularRecord::from_row(&headers, cells));
        }

        tracing::debug!(
            columns = headers.len(),
            rows = records.len(),
            "read input table"
        );
        Ok(Self { headers, records })
    }

    /// Cells of the data column at `index`, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.records
            .iter()
            .filter_map(move |record| record.fields.get(index).map(|(_, cell)| cell))
    }
}

/// Validate the header row and return the data headers.
fn data_headers(row: &csv::StringRecord, config: &TableConfig) -> Result<Vec<String>, TableError> {
    let all: Vec<String> = row.iter().map(|h| h.trim().to_string()).collect();

    let path_index = all
        .iter()
        .position(|h| *h == config.path_column)
        .ok_or_else(|| TableError::MissingColumn {
            column: config.path_column.clone(),
        })?;

    let headers = all[..path_index].to_vec();

    let mut seen = HashSet::new();
    for (index, header) in headers.iter().enumerate() {
        if header.is_empty() {
            return Err(TableError::BlankHeader { index });
        }
        if !seen.insert(header.as_str()) {
            return Err(TableError::DuplicateHeader {
                header: header.clone(),
            });
        }
    }

    if !seen.contains(config.name_column.as_str()) {
        return Err(TableError::MissingColumn {
            column: config.name_column.clone(),
        });
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read(csv: &str) -> Result<Table, TableError> {
        Table::from_reader(csv.as_bytes(), &TableConfig::header_first())
    }

    #[test]
    fn splits_data_and_path_columns() {
        let table = read(
            "name,organism,treatment.H.probe.concentration,path,,\n\
             Foo,human,5,/data/a/dta,/data/b/dta,\n",
        )
        .unwrap();

        assert_eq!(
            table.headers,
            vec!["name", "organism", "treatment.H.probe.concentration"]
        );
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].paths, vec!["/data/a/dta", "/data/b/dta"]);
        assert_eq!(
            table.records[0].get("organism"),
            Some(&CellValue::Text("human".into()))
        );
    }

    #[test]
    fn default_layout_skips_template_description_row_and_blank_lines() {
        let config = TableConfig::default();
        let table = Table::from_reader(
            "Dataset sideload template,,\nname,organism,path\nFoo,human,/a/dta\n,,\nBar,mouse,/b/dta\n"
                .as_bytes(),
            &config,
        )
        .unwrap();

        let names: Vec<String> = table
            .column(0)
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["Foo", "Bar"]);
    }

    #[test]
    fn missing_path_column_is_rejected() {
        let err = read("name,organism\nFoo,human\n").unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { ref column } if column == "path"));
    }

    #[test]
    fn missing_name_column_is_rejected() {
        let err = read("title,organism,path\nFoo,human,/a\n").unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { ref column } if column == "name"));
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let err = read("name,organism,organism,path\n").unwrap_err();
        assert!(matches!(err, TableError::DuplicateHeader { .. }));
    }

    #[test]
    fn blank_header_is_rejected() {
        let err = read("name,,path\n").unwrap_err();
        assert!(matches!(err, TableError::BlankHeader { index: 1 }));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datasets.csv");
        std::fs::write(&path, "name,path\nFoo,/a/dta\n").unwrap();

        let table = Table::read_csv(&path, &TableConfig::header_first()).unwrap();

        assert_eq!(table.records.len(), 1);
        assert!(matches!(
            Table::read_csv(&dir.path().join("missing.csv"), &TableConfig::header_first()),
            Err(TableError::Io { .. })
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(read("").unwrap_err(), TableError::Empty));
    }
}
