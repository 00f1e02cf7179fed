use std::fmt;

use serde::Deserialize;

use crate::{ext::SampleExt, table::Table};

/// The aggregate measures computed for every column, in reporting order.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
  Average,
  Median,
  StdDev,
  Variance,
  Max,
  Min,
  Kurtosis,
  Skewness,
}

impl StatKind {
  pub const ALL: [StatKind; 8] = [
    StatKind::Average,
    StatKind::Median,
    StatKind::StdDev,
    StatKind::Variance,
    StatKind::Max,
    StatKind::Min,
    StatKind::Kurtosis,
    StatKind::Skewness,
  ];

  pub fn name(self) -> &'static str {
    match self {
      StatKind::Average => "Average",
      StatKind::Median => "Median",
      StatKind::StdDev => "Std Dev",
      StatKind::Variance => "Variance",
      StatKind::Max => "Max",
      StatKind::Min => "Min",
      StatKind::Kurtosis => "Kurtosis",
      StatKind::Skewness => "Skewness",
    }
  }

  pub fn compute(self, samples: &[f64]) -> f64 {
    match self {
      StatKind::Average => samples.mean(),
      StatKind::Median => samples.median(),
      StatKind::StdDev => samples.std_dev(),
      StatKind::Variance => samples.variance(),
      StatKind::Max => samples.maximum(),
      StatKind::Min => samples.minimum(),
      StatKind::Kurtosis => samples.kurtosis(),
      StatKind::Skewness => samples.skewness(),
    }
  }
}

impl fmt::Display for StatKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// One statistic kind evaluated over every column, in column order.
#[derive(Clone, Debug, PartialEq)]
pub struct StatResult {
  pub kind: StatKind,
  pub values: Vec<(String, f64)>,
}

impl StatResult {
  /// Value for `column`; with duplicate column names the first one wins.
  pub fn get(&self, column: &str) -> Option<f64> {
    self.values.iter().find(|(name, _)| name == column).map(|&(_, value)| value)
  }
}

/// Every statistic kind for a table, in `StatKind::ALL` order.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
  pub results: Vec<StatResult>,
}

impl Summary {
  pub fn compute(table: &Table) -> Self {
    let results = StatKind::ALL
      .into_iter()
      .map(|kind| StatResult {
        kind,
        values: table
          .columns
          .iter()
          .map(|column| (column.name.clone(), kind.compute(&column.values)))
          .collect(),
      })
      .collect();

    Self { results }
  }

  pub fn result(&self, kind: StatKind) -> &StatResult {
    // compute() fills every kind in ALL order
    &self.results[kind as usize]
  }

  pub fn get(&self, kind: StatKind, column: &str) -> Option<f64> {
    self.result(kind).get(column)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::table::Column;

  fn table(columns: &[(&str, &[f64])]) -> Table {
    Table {
      columns: columns
        .iter()
        .map(|(name, values)| Column { name: name.to_string(), values: values.to_vec() })
        .collect(),
    }
  }

  #[test]
  fn two_column_table() {
    let summary = Summary::compute(&table(&[("A", &[1.0, 3.0, 5.0]), ("B", &[2.0, 4.0, 6.0])]));

    assert_eq!(summary.get(StatKind::Average, "A"), Some(3.0));
    assert_eq!(summary.get(StatKind::Average, "B"), Some(4.0));
    assert_eq!(summary.get(StatKind::Median, "A"), Some(3.0));
    assert_eq!(summary.get(StatKind::StdDev, "A"), Some(2.0));
    assert_eq!(summary.get(StatKind::Variance, "B"), Some(4.0));
    assert_eq!(summary.get(StatKind::Max, "B"), Some(6.0));
    assert_eq!(summary.get(StatKind::Min, "A"), Some(1.0));
    assert_eq!(summary.get(StatKind::Average, "C"), None);
  }

  #[test]
  fn results_follow_reporting_order() {
    let summary = Summary::compute(&table(&[("x", &[1.0, 2.0])]));
    let kinds: Vec<_> = summary.results.iter().map(|r| r.kind).collect();

    assert_eq!(kinds, StatKind::ALL);
    for kind in StatKind::ALL {
      assert_eq!(summary.result(kind).kind, kind);
    }
  }

  #[test]
  fn constant_column_keeps_nan_shape() {
    let summary = Summary::compute(&table(&[("c", &[5.0, 5.0, 5.0, 5.0])]));

    assert_eq!(summary.get(StatKind::Variance, "c"), Some(0.0));
    assert_eq!(summary.get(StatKind::StdDev, "c"), Some(0.0));
    assert!(summary.get(StatKind::Skewness, "c").unwrap().is_nan());
    assert!(summary.get(StatKind::Kurtosis, "c").unwrap().is_nan());
  }

  #[test]
  fn constant_fractional_columns_keep_nan_shape() {
    let summary = Summary::compute(&table(&[
      ("tenths", &[0.1, 0.1, 0.1, 0.1, 0.1, 0.1]),
      ("micros", &[0.00000175, 0.00000175, 0.00000175, 0.00000175, 0.00000175]),
      ("short", &[0.1, 0.1, 0.1]),
    ]));

    for column in ["tenths", "micros", "short"] {
      assert_eq!(summary.get(StatKind::Variance, column), Some(0.0), "{column}");
      assert_eq!(summary.get(StatKind::StdDev, column), Some(0.0), "{column}");
      assert!(summary.get(StatKind::Skewness, column).unwrap().is_nan(), "{column}");
      assert!(summary.get(StatKind::Kurtosis, column).unwrap().is_nan(), "{column}");
    }
  }

  #[test]
  fn names_match_listing_headings() {
    let names: Vec<_> = StatKind::ALL.iter().map(|kind| kind.to_string()).collect();

    assert_eq!(names, ["Average", "Median", "Std Dev", "Variance", "Max", "Min", "Kurtosis", "Skewness"]);
  }
}
