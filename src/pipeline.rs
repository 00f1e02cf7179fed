use std::process::Command;

use anyhow::{Context, Result};
use tracing::info;

use crate::{
  chart,
  config::Config,
  format, report,
  stats::Summary,
  table::Table,
};

pub struct Pipeline {
  config: Config,
  /// Builds the command that `run(true)` opens each chart with.
  viewer: fn() -> Command,
}

impl Pipeline {
  pub fn new(config: Config) -> Result<Self> {
    config.validate().context("config")?;

    Ok(Self { config, viewer: chart::viewer })
  }

  #[cfg(test)]
  fn with_viewer(self, viewer: fn() -> Command) -> Self {
    Self { viewer, ..self }
  }

  /// Converts the report into the comma-separated table.
  pub fn convert(&self) -> Result<usize> {
    info!("converting {:?}", self.config.input);

    report::convert(&self.config.input, &self.config.output).context("convert")
  }

  /// Converts the report, then loads the table and computes its statistics,
  /// printing the listing to stdout.
  pub fn stats(&self) -> Result<Summary> {
    self.convert()?;

    info!("loading {:?}", self.config.output);
    let table = Table::load(&self.config.output).context("load")?;
    info!(columns = table.columns.len(), rows = table.rows(), "computing statistics");

    let summary = Summary::compute(&table);
    print!("{}", format::listing(&summary).context("format")?);

    Ok(summary)
  }

  /// Runs every stage and renders the configured charts.
  pub fn run(&self, show: bool) -> Result<Summary> {
    let summary = self.stats()?;

    for spec in &self.config.charts {
      info!("rendering {:?} chart", spec.kind);
      chart::render(spec, &self.config.groups, &summary)?;
      println!("Wrote {}", spec.file.display());

      if show {
        chart::show((self.viewer)(), &spec.file);
      }
    }

    Ok(summary)
  }
}
