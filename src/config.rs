use std::{fmt, fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::stats::StatKind;

/// A single benchmarked operation, in category-axis order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
  Insert,
  Lookup,
  Delete,
}

impl Operation {
  pub const ALL: [Operation; 3] = [Operation::Insert, Operation::Lookup, Operation::Delete];

  pub fn label(self) -> &'static str {
    match self {
      Operation::Insert => "insert",
      Operation::Lookup => "lookup",
      Operation::Delete => "delete",
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// The three columns belonging to one structure under test, each explicitly
/// paired with the operation it measures.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ColumnGroup {
  pub name: String,
  pub insert: String,
  pub lookup: String,
  pub delete: String,
}

impl ColumnGroup {
  pub fn new(name: &str, insert: &str, lookup: &str, delete: &str) -> Self {
    Self {
      name: name.to_string(),
      insert: insert.to_string(),
      lookup: lookup.to_string(),
      delete: delete.to_string(),
    }
  }

  pub fn column(&self, op: Operation) -> &str {
    match op {
      Operation::Insert => &self.insert,
      Operation::Lookup => &self.lookup,
      Operation::Delete => &self.delete,
    }
  }

  /// Column names in category-axis order.
  pub fn columns(&self) -> [&str; 3] {
    Operation::ALL.map(|op| self.column(op))
  }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
  Line,
  Bar,
  Combined,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChartSpec {
  pub kind: ChartKind,
  /// Statistic plotted by line and bar charts. Combined charts plot all of
  /// them and ignore this.
  #[serde(default = "default_statistic")]
  pub statistic: StatKind,
  pub file: PathBuf,
  #[serde(default)]
  pub title: String,
}

fn default_statistic() -> StatKind {
  StatKind::Average
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Raw whitespace-delimited report.
  pub input: PathBuf,
  /// Comma-separated file the report is converted into.
  pub output: PathBuf,
  pub groups: Vec<ColumnGroup>,
  pub charts: Vec<ChartSpec>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      input: PathBuf::from("./output.txt"),
      output: PathBuf::from("./data.csv"),
      groups: vec![
        ColumnGroup::new("Hash", "Map_01_Insert", "Map_01_LookUp", "Map_01_Delete"),
        ColumnGroup::new("Array", "Map_02_Insert", "Map_02_LookUp", "Map_02_Delete"),
      ],
      charts: vec![
        ChartSpec {
          kind: ChartKind::Line,
          statistic: StatKind::Average,
          file: PathBuf::from("average_plot_updated.png"),
          title: "Average Performance of eBPF Hash and Array Operations".to_string(),
        },
        ChartSpec {
          kind: ChartKind::Combined,
          statistic: StatKind::Average,
          file: PathBuf::from("combined_plot_updated.png"),
          title: "Statistics of eBPF Hash and Array Operations".to_string(),
        },
      ],
    }
  }
}

impl Config {
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).with_context(|| format!("read {path:?}"))?;

    Self::parse(&data).with_context(|| format!("config {path:?}"))
  }

  pub fn parse(data: &str) -> Result<Self> {
    toml::from_str(data).context("toml")
  }

  pub fn validate(&self) -> Result<()> {
    if self.groups.is_empty() {
      anyhow::bail!("at least one column group is required");
    }

    for group in &self.groups {
      if group.name.trim().is_empty() {
        anyhow::bail!("column group with empty name");
      }

      for (op, column) in Operation::ALL.into_iter().zip(group.columns()) {
        if column.trim().is_empty() {
          anyhow::bail!("column group {:?} has no {op} column", group.name);
        }
      }
    }

    for chart in &self.charts {
      if chart.file.as_os_str().is_empty() {
        anyhow::bail!("{:?} chart has an empty file name", chart.kind);
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_matches_fixed_paths() {
    let config = Config::default();

    assert_eq!(config.input, PathBuf::from("./output.txt"));
    assert_eq!(config.output, PathBuf::from("./data.csv"));
    assert_eq!(config.groups[0].columns(), ["Map_01_Insert", "Map_01_LookUp", "Map_01_Delete"]);
    assert_eq!(config.groups[1].columns(), ["Map_02_Insert", "Map_02_LookUp", "Map_02_Delete"]);
    assert_eq!(config.charts.len(), 2);
    assert_eq!(config.charts[0].file, PathBuf::from("average_plot_updated.png"));
    assert_eq!(config.charts[1].file, PathBuf::from("combined_plot_updated.png"));
    config.validate().unwrap();
  }

  #[test]
  fn parse_partial_config_keeps_defaults() {
    let config = Config::parse(
      r#"
        input = "bench.txt"

        [[groups]]
        name = "Hash"
        insert = "hash_ins"
        lookup = "hash_look"
        delete = "hash_del"

        [[charts]]
        kind = "bar"
        statistic = "median"
        file = "bar.svg"
      "#,
    )
    .unwrap();

    assert_eq!(config.input, PathBuf::from("bench.txt"));
    assert_eq!(config.output, PathBuf::from("./data.csv"));
    assert_eq!(config.groups, vec![ColumnGroup::new("Hash", "hash_ins", "hash_look", "hash_del")]);
    assert_eq!(config.charts[0].kind, ChartKind::Bar);
    assert_eq!(config.charts[0].statistic, StatKind::Median);
    assert_eq!(config.charts[0].title, "");
  }

  #[test]
  fn statistic_defaults_to_average() {
    let config = Config::parse(
      r#"
        [[charts]]
        kind = "line"
        file = "line.svg"
      "#,
    )
    .unwrap();

    assert_eq!(config.charts[0].statistic, StatKind::Average);
  }

  #[test]
  fn rejects_invalid_configs() {
    assert!(Config::parse("bogus = 1").is_err());

    // well-formed toml only fails validation
    let no_groups = Config::parse("groups = []").unwrap();
    assert!(no_groups.validate().is_err());

    let empty_column = r#"
      [[groups]]
      name = "Hash"
      insert = "a"
      lookup = ""
      delete = "c"
    "#;
    assert!(Config::parse(empty_column).unwrap().validate().is_err());

    let empty_file = r#"
      [[charts]]
      kind = "combined"
      file = ""
    "#;
    assert!(Config::parse(empty_file).unwrap().validate().is_err());
  }

  #[test]
  fn shipped_demo_config_parses() {
    let config = Config::parse(include_str!("../demos/hash_vs_array.toml")).unwrap();

    assert_eq!(config.groups[0].columns(), ["hash_ins", "hash_look", "hash_del"]);
    assert_eq!(config.groups[1].columns(), ["arr_ins", "arr_look", "arr_clear"]);
    assert_eq!(config.charts.iter().map(|c| c.kind).collect::<Vec<_>>(), [ChartKind::Line, ChartKind::Bar]);
    config.validate().unwrap();
  }
}
