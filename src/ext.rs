use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};

#[extend::ext(name = ExitStatusExt)]
pub impl ExitStatus {
  fn check_success(&self) -> Result<()> {
    if !self.success() {
      anyhow::bail!("exited with non-zero status {self}");
    }

    Ok(())
  }
}

#[extend::ext(name = CommandExt)]
pub impl Command {
  /// Runs the command with its output discarded, returning an error on
  /// non-zero exit.
  fn check_success_quiet(&mut self) -> Result<()> {
    self
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status()
      .context("status")?
      .check_success()
  }
}

// Descriptive statistics over one column of samples. Anything undefined for the
// sample size, or the shape statistics of a constant column, comes back as NaN.
#[extend::ext(name = SampleExt)]
pub impl [f64] {
  fn mean(&self) -> f64 {
    if self.is_empty() {
      return f64::NAN;
    }

    self.iter().sum::<f64>() / self.len() as f64
  }

  fn median(&self) -> f64 {
    if self.is_empty() {
      return f64::NAN;
    }

    let mut sorted = self.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
      (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
      sorted[mid]
    }
  }

  /// True when every sample is the same value. A rounded mean makes the
  /// central sums of such a column tiny but non-zero, so callers check this
  /// first.
  fn is_constant(&self) -> bool {
    !self.is_empty() && self.minimum() == self.maximum()
  }

  /// Sum of `(x - mean)^k`.
  fn central_sum(&self, k: i32) -> f64 {
    let mean = self.mean();
    self.iter().map(|x| (x - mean).powi(k)).sum()
  }

  /// Sample variance (N - 1 denominator).
  fn variance(&self) -> f64 {
    let n = self.len();
    if n < 2 {
      return f64::NAN;
    }
    if self.is_constant() {
      return 0.0;
    }

    self.central_sum(2) / (n - 1) as f64
  }

  fn std_dev(&self) -> f64 {
    self.variance().sqrt()
  }

  fn maximum(&self) -> f64 {
    if self.is_empty() {
      return f64::NAN;
    }

    self.iter().copied().fold(f64::NEG_INFINITY, f64::max)
  }

  fn minimum(&self) -> f64 {
    if self.is_empty() {
      return f64::NAN;
    }

    self.iter().copied().fold(f64::INFINITY, f64::min)
  }

  /// Adjusted Fisher-Pearson skewness (G1).
  fn skewness(&self) -> f64 {
    let n = self.len() as f64;
    if self.len() < 3 || self.is_constant() {
      return f64::NAN;
    }

    let m2 = self.central_sum(2) / n;
    let m3 = self.central_sum(3) / n;
    if m2 == 0.0 {
      return f64::NAN;
    }

    (n * (n - 1.0)).sqrt() / (n - 2.0) * (m3 / m2.powf(1.5))
  }

  /// Bias-corrected excess kurtosis (G2), zero for a normal distribution.
  fn kurtosis(&self) -> f64 {
    let n = self.len() as f64;
    if self.len() < 4 || self.is_constant() {
      return f64::NAN;
    }

    let s2 = self.central_sum(2);
    let s4 = self.central_sum(4);
    if s2 == 0.0 {
      return f64::NAN;
    }

    let numer = (n + 1.0) * n * (n - 1.0) * s4;
    let denom = (n - 2.0) * (n - 3.0) * s2 * s2;
    let adj = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));

    numer / denom - adj
  }
}
