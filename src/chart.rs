use std::{path::Path, process::Command, sync::OnceLock};

use anyhow::{Context, Result};
use plotters::{coord::Shift, prelude::*, series::DashedLineSeries, style::register_font};
use tracing::warn;

use crate::{
  config::{ChartKind, ChartSpec, ColumnGroup, Operation},
  ext::CommandExt,
  stats::{StatKind, Summary},
};

const GROUP_COLORS: [RGBColor; 2] = [BLUE, RED];

/// Colors for the non-average statistics of a combined chart, reused from the
/// start once exhausted.
const PALETTE: [RGBColor; 6] = [
  RGBColor(0, 128, 0),
  RGBColor(0, 191, 191),
  RGBColor(191, 0, 191),
  RGBColor(191, 191, 0),
  BLACK,
  RGBColor(255, 165, 0),
];

/// Text is drawn with this font so that bitmap output needs no system fonts.
const FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

const BAR_WIDTH: f64 = 0.35;
const MARKER_SIZE: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stroke {
  Solid,
  Dashed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
  Circle,
  Square,
}

impl Marker {
  fn for_group(index: usize) -> Self {
    if index == 0 {
      Marker::Circle
    } else {
      Marker::Square
    }
  }
}

/// One plotted line (or set of bars), with a value per operation in
/// category-axis order.
#[derive(Clone)]
pub struct Series {
  pub label: String,
  pub values: [f64; 3],
  pub color: RGBColor,
  pub stroke: Stroke,
  pub marker: Marker,
}

impl Series {
  /// Plot coordinates, leaving out undefined values.
  fn points(&self) -> impl Iterator<Item = (f64, f64)> {
    self
      .values
      .into_iter()
      .enumerate()
      .filter(|(_, value)| value.is_finite())
      .map(|(i, value)| (i as f64, value))
  }
}

fn group_color(index: usize) -> RGBColor {
  GROUP_COLORS
    .get(index)
    .copied()
    .unwrap_or_else(|| PALETTE[(index - GROUP_COLORS.len()) % PALETTE.len()])
}

/// Looks up `kind` for each of the group's columns. The values follow the
/// columns the group names, whatever those columns actually measure.
fn group_values(group: &ColumnGroup, kind: StatKind, summary: &Summary) -> Result<[f64; 3]> {
  let mut values = [f64::NAN; 3];

  for (value, op) in values.iter_mut().zip(Operation::ALL) {
    let column = group.column(op);
    *value = summary
      .get(kind, column)
      .with_context(|| format!("group {:?}: no column {column:?}", group.name))?;
  }

  Ok(values)
}

/// Builds every series drawn by a chart, in drawing (and legend) order.
pub fn series(spec: &ChartSpec, groups: &[ColumnGroup], summary: &Summary) -> Result<Vec<Series>> {
  let mut series = Vec::new();

  match spec.kind {
    ChartKind::Line | ChartKind::Bar => {
      for (i, group) in groups.iter().enumerate() {
        series.push(Series {
          label: group.name.clone(),
          values: group_values(group, spec.statistic, summary)?,
          color: group_color(i),
          stroke: Stroke::Solid,
          marker: Marker::for_group(i),
        });
      }
    }
    ChartKind::Combined => {
      for (i, group) in groups.iter().enumerate() {
        series.push(Series {
          label: format!("{} {}", group.name, StatKind::Average),
          values: group_values(group, StatKind::Average, summary)?,
          color: group_color(i),
          stroke: Stroke::Solid,
          marker: Marker::for_group(i),
        });
      }

      let rest = StatKind::ALL.into_iter().filter(|kind| *kind != StatKind::Average);
      for (k, kind) in rest.enumerate() {
        let color = PALETTE[k % PALETTE.len()];

        for (i, group) in groups.iter().enumerate() {
          series.push(Series {
            label: format!("{} {kind}", group.name),
            values: group_values(group, kind, summary)?,
            color,
            stroke: if i == 0 { Stroke::Solid } else { Stroke::Dashed },
            marker: Marker::for_group(i),
          });
        }
      }
    }
  }

  Ok(series)
}

fn y_range(series: &[Series], from_zero: bool) -> (f64, f64) {
  let (mut lo, mut hi) = series
    .iter()
    .flat_map(|s| s.values)
    .filter(|value| value.is_finite())
    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| (lo.min(value), hi.max(value)));

  if lo > hi {
    return (0.0, 1.0);
  }

  if from_zero {
    lo = lo.min(0.0);
    hi = hi.max(0.0);
  }

  let pad = if hi > lo {
    (hi - lo) * 0.1
  } else if hi != 0.0 {
    hi.abs() * 0.1
  } else {
    1.0
  };

  let lo = if from_zero && lo == 0.0 { 0.0 } else { lo - pad };
  (lo, hi + pad)
}

/// Tick label for the category axis; only the whole positions name an
/// operation.
fn category_label(x: &f64) -> String {
  let index = x.round();
  if (x - index).abs() > f64::EPSILON || index < 0.0 {
    return String::new();
  }

  Operation::ALL
    .get(index as usize)
    .map(|op| op.label().to_string())
    .unwrap_or_default()
}

fn value_label(y: &f64) -> String {
  format!("{y:.3e}")
}

fn draw<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, spec: &ChartSpec, series: &[Series]) -> Result<()>
where
  DB::ErrorType: 'static,
{
  root.fill(&WHITE)?;

  let (lo, hi) = y_range(series, spec.kind == ChartKind::Bar);
  let mut chart = ChartBuilder::on(&root)
    .caption(&spec.title, ("sans-serif", 24))
    .margin(20)
    .x_label_area_size(50)
    .y_label_area_size(90)
    .build_cartesian_2d(-0.5f64..2.5f64, lo..hi)?;

  chart
    .configure_mesh()
    .x_labels(Operation::ALL.len())
    .x_label_formatter(&category_label)
    .y_label_formatter(&value_label)
    .x_desc("Operation Type")
    .y_desc("Value")
    .draw()?;

  match spec.kind {
    ChartKind::Line | ChartKind::Combined => {
      for s in series {
        let points: Vec<_> = s.points().collect();
        let line = s.color.stroke_width(2);
        let marker = s.color.filled();

        let anno = match s.stroke {
          Stroke::Solid => chart.draw_series(LineSeries::new(points.clone(), line))?,
          Stroke::Dashed => chart.draw_series(DashedLineSeries::new(points.clone(), 10, 5, line))?,
        };
        anno
          .label(s.label.clone())
          .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));

        match s.marker {
          Marker::Circle => {
            chart.draw_series(points.iter().map(|&p| Circle::new(p, MARKER_SIZE, marker)))?;
          }
          Marker::Square => {
            chart.draw_series(points.iter().map(|&p| {
              EmptyElement::at(p) + Rectangle::new([(-MARKER_SIZE, -MARKER_SIZE), (MARKER_SIZE, MARKER_SIZE)], marker)
            }))?;
          }
        }
      }
    }
    ChartKind::Bar => {
      let n = series.len() as f64;

      for (i, s) in series.iter().enumerate() {
        let offset = (i as f64 - (n - 1.0) / 2.0) * BAR_WIDTH;
        let fill = s.color.filled();

        chart
          .draw_series(s.points().map(|(x, y)| {
            let x = x + offset;
            Rectangle::new([(x - BAR_WIDTH / 2.0, 0.0), (x + BAR_WIDTH / 2.0, y)], fill)
          }))?
          .label(s.label.clone())
          .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill));
      }
    }
  }

  chart
    .configure_series_labels()
    .position(SeriesLabelPosition::UpperRight)
    .background_style(&WHITE.mix(0.8))
    .border_style(&BLACK)
    .draw()?;

  root.present()?;

  Ok(())
}

fn register_fonts() -> Result<()> {
  static REGISTERED: OnceLock<bool> = OnceLock::new();

  let ok = *REGISTERED.get_or_init(|| register_font("sans-serif", FontStyle::Normal, FONT).is_ok());
  if !ok {
    anyhow::bail!("embedded chart font is not a valid OpenType font");
  }

  Ok(())
}

/// Renders one chart to `spec.file`, overwriting it. The image format follows
/// the file extension.
pub fn render(spec: &ChartSpec, groups: &[ColumnGroup], summary: &Summary) -> Result<()> {
  register_fonts()?;

  let series = series(spec, groups, summary)?;
  let path = spec.file.as_path();
  let size = match spec.kind {
    ChartKind::Combined => (1400, 800),
    ChartKind::Line | ChartKind::Bar => (1000, 600),
  };

  let result = match path.extension().and_then(|ext| ext.to_str()) {
    Some(ext) if ext.eq_ignore_ascii_case("png") => {
      draw(BitMapBackend::new(path, size).into_drawing_area(), spec, &series)
    }
    Some(ext) if ext.eq_ignore_ascii_case("svg") => {
      draw(SVGBackend::new(path, size).into_drawing_area(), spec, &series)
    }
    _ => anyhow::bail!("{path:?}: unsupported image format, expected .png or .svg"),
  };

  result.with_context(|| format!("render {path:?}"))
}

/// The platform's image viewer, without the file argument.
pub fn viewer() -> Command {
  if cfg!(target_os = "macos") {
    Command::new("open")
  } else if cfg!(windows) {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]);
    cmd
  } else {
    Command::new("xdg-open")
  }
}

/// Opens a rendered chart with `viewer`. Failing to do so (no display, no
/// viewer installed) only logs a warning.
pub fn show(mut viewer: Command, path: &Path) {
  if let Err(err) = viewer.arg(path).check_success_quiet() {
    warn!("could not display {path:?}: {err:#}");
  }
}
