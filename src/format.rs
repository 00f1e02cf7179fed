use std::fmt::Write;

use anyhow::Result;

use crate::stats::{StatKind, Summary};

const COLUMN_WIDTH: usize = 14;
const COLUMN_PADDING: &str = "  ";

/// Every statistic kind followed by one `column: value` line per column.
pub fn listing(summary: &Summary) -> Result<String> {
  let mut out = String::new();

  for result in &summary.results {
    writeln!(out, "{} values:", result.kind)?;
    for (column, value) in &result.values {
      writeln!(out, "{column}: {value:?}")?;
    }
    writeln!(out)?;
  }

  Ok(out)
}

fn format_header() -> String {
  let header = std::iter::once("column")
    .chain(StatKind::ALL.iter().map(|kind| kind.name()))
    .map(|col| format!("{col:<COLUMN_WIDTH$}"))
    .collect::<Vec<_>>()
    .join(COLUMN_PADDING);

  format!("{header}\n{}", "=".repeat(header.len()))
}

fn format_value(value: f64) -> String {
  if value.is_nan() {
    "NaN".to_string()
  } else {
    format!("{value:.6e}")
  }
}

/// The same numbers as `listing`, one row per column.
pub fn table(summary: &Summary) -> Result<String> {
  let mut out = String::new();

  writeln!(out, "{}", format_header())?;

  let Some(first) = summary.results.first() else {
    return Ok(out);
  };

  for (i, (column, _)) in first.values.iter().enumerate() {
    let row = std::iter::once(format!("{column:<COLUMN_WIDTH$}"))
      .chain(
        summary
          .results
          .iter()
          .map(|result| format!("{:>COLUMN_WIDTH$}", format_value(result.values[i].1))),
      )
      .collect::<Vec<_>>()
      .join(COLUMN_PADDING);

    writeln!(out, "{row}")?;
  }

  Ok(out)
}
