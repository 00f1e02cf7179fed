use std::{fs, path::Path};

use anyhow::{Context, Result};
use csv::WriterBuilder;
use tracing::debug;

/// Splits a whitespace-delimited report into its header and data rows. Blank
/// lines are skipped; rows are not checked against the header's width.
fn parse_report(text: &str) -> Result<(Vec<&str>, Vec<Vec<&str>>)> {
  let mut lines = text.lines().filter(|line| !line.trim().is_empty());

  let header = lines.next().context("report is empty")?.split_whitespace().collect();
  let rows = lines.map(|line| line.split_whitespace().collect()).collect();

  Ok((header, rows))
}

/// Converts the report at `input` into a comma-separated file at `output`,
/// returning the number of data rows written. Fields are copied verbatim.
///
/// # Errors
///
/// This will return an error if:
/// - `input` cannot be read or holds no header line.
/// - `output` cannot be written.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<usize> {
  let input = input.as_ref();
  let output = output.as_ref();

  let text = fs::read_to_string(input).with_context(|| format!("read {input:?}"))?;
  let (header, rows) = parse_report(&text).with_context(|| format!("parse {input:?}"))?;

  debug!(columns = header.len(), rows = rows.len(), "parsed report");

  // ragged rows are passed through, the table loader rejects them
  let mut writer = WriterBuilder::new()
    .flexible(true)
    .from_path(output)
    .with_context(|| format!("create {output:?}"))?;

  writer.write_record(&header).context("write header")?;
  for row in &rows {
    writer.write_record(row).context("write row")?;
  }
  writer.flush().context("flush")?;

  println!("Converted {} to {}", input.display(), output.display());

  Ok(rows.len())
}
