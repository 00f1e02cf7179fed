mod chart;
mod config;
mod ext;
mod format;
mod pipeline;
mod report;
mod stats;
mod table;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use self::{config::Config, pipeline::Pipeline};

/// Turns a whitespace-delimited map benchmark report into a CSV table,
/// descriptive statistics and comparison charts.
#[derive(Parser)]
#[command(version, about)]
struct Args {
  /// TOML file with paths, column groups and charts. Built-in defaults are used
  /// when omitted.
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,
  /// Raw report to read, overriding the configured one.
  #[arg(long, global = true)]
  input: Option<PathBuf>,
  /// CSV file to write, overriding the configured one.
  #[arg(long, global = true)]
  output: Option<PathBuf>,
  /// More logging; repeat for more.
  #[arg(short, long, global = true, action = ArgAction::Count)]
  verbose: u8,
  /// Only log warnings and errors.
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  quiet: bool,
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Convert, compute statistics and render every configured chart.
  Run {
    /// Open each chart in the system image viewer once written.
    #[arg(long)]
    show: bool,
  },
  /// Only convert the report into CSV.
  Convert,
  /// Convert and print statistics, without rendering charts.
  Stats {
    /// Also print the statistics as a single table.
    #[arg(long)]
    table: bool,
  },
}

fn init_logging(verbose: u8, quiet: bool) {
  let level = match (quiet, verbose) {
    (true, _) => Level::WARN,
    (false, 0) => Level::INFO,
    (false, 1) => Level::DEBUG,
    (false, _) => Level::TRACE,
  };

  tracing_subscriber::fmt()
    .with_max_level(level)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn main() -> Result<()> {
  let args = Args::parse();
  init_logging(args.verbose, args.quiet);

  let mut config = match &args.config {
    Some(path) => Config::load(path)?,
    None => Config::default(),
  };
  if let Some(input) = args.input {
    config.input = input;
  }
  if let Some(output) = args.output {
    config.output = output;
  }

  let pipeline = Pipeline::new(config).context("Pipeline::new")?;

  match args.command.unwrap_or(Command::Run { show: false }) {
    Command::Run { show } => {
      pipeline.run(show).context("run")?;
    }
    Command::Convert => {
      pipeline.convert().context("convert")?;
    }
    Command::Stats { table } => {
      let summary = pipeline.stats().context("stats")?;

      if table {
        println!("{}", format::table(&summary).context("format")?);
      }
    }
  }

  Ok(())
}
