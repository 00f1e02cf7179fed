use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
  #[error("read {path:?}")]
  Io {
    path: PathBuf,
    #[source]
    source: csv::Error,
  },
  #[error("malformed csv")]
  Csv(#[from] csv::Error),
  #[error("line {line}: expected {expected} fields, found {found}")]
  Ragged { line: u64, expected: usize, found: usize },
  #[error("line {line}: column {column:?} holds non-numeric value {value:?}")]
  NotNumeric { column: String, line: u64, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
  pub name: String,
  pub values: Vec<f64>,
}

/// Numeric samples keyed by column, in header order. Rows keep their file
/// order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
  pub columns: Vec<Column>,
}

impl Table {
  /// Loads a comma-separated file whose first record is the header and whose
  /// other records are all numeric. Nothing is returned unless every field
  /// parses.
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
    let path = path.as_ref();

    let mut reader = ReaderBuilder::new()
      .flexible(true)
      .from_path(path)
      .map_err(|source| TableError::Io { path: path.to_path_buf(), source })?;

    let mut columns: Vec<Column> = reader
      .headers()?
      .iter()
      .map(|name| Column { name: name.to_string(), values: Vec::new() })
      .collect();

    for record in reader.records() {
      let record = record?;
      let line = record.position().map_or(0, |pos| pos.line());

      if record.len() != columns.len() {
        return Err(TableError::Ragged { line, expected: columns.len(), found: record.len() });
      }

      for (column, field) in columns.iter_mut().zip(record.iter()) {
        let value = field.trim().parse::<f64>().map_err(|_| TableError::NotNumeric {
          column: column.name.clone(),
          line,
          value: field.to_string(),
        })?;

        column.values.push(value);
      }
    }

    Ok(Self { columns })
  }

  pub fn rows(&self) -> usize {
    self.columns.first().map_or(0, |column| column.values.len())
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  fn load_str(csv: &str) -> Result<Table, TableError> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, csv).unwrap();

    Table::load(&path)
  }

  #[test]
  fn loads_columns_in_order() {
    let table = load_str("A,B\n1,2\n3,4\n5,6\n").unwrap();

    assert_eq!(table.rows(), 3);
    assert_eq!(table.columns[0], Column { name: "A".into(), values: vec![1.0, 3.0, 5.0] });
    assert_eq!(table.columns[1], Column { name: "B".into(), values: vec![2.0, 4.0, 6.0] });
  }

  #[test]
  fn header_only_table_has_empty_columns() {
    let table = load_str("A,B\n").unwrap();

    assert_eq!(table.columns.len(), 2);
    assert_eq!(table.rows(), 0);
  }

  #[test]
  fn duplicate_names_are_separate_columns() {
    let table = load_str("a,a\n1,2\n").unwrap();
    let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();

    assert_eq!(names, ["a", "a"]);
    assert_eq!(table.columns[1].values, [2.0]);
  }

  #[test]
  fn short_row_is_a_shape_error() {
    let err = load_str("a,b,c\n1,2,3\n4,5\n").unwrap_err();

    assert!(
      matches!(err, TableError::Ragged { line: 3, expected: 3, found: 2 }),
      "{err:?}"
    );
  }

  #[test]
  fn non_numeric_field_fails_the_load() {
    let err = load_str("a,b\n1,2\n3,x\n").unwrap_err();

    match err {
      TableError::NotNumeric { column, line, value } => {
        assert_eq!(column, "b");
        assert_eq!(line, 3);
        assert_eq!(value, "x");
      }
      err => panic!("unexpected error {err:?}"),
    }
  }

  #[test]
  fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Table::load(dir.path().join("missing.csv")).unwrap_err();

    assert!(matches!(err, TableError::Io { .. }), "{err:?}");
  }
}
