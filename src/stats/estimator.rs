//! # Estimator
//!
//! $$
//! \operatorname{Cov}(a,b) = \frac{1}{n-1}\sum_{t=1}^n (a_t-\bar a)(b_t-\bar b)
//! $$
//!
//! Geometric mean return, sample variance and sample covariance of gross-return
//! series, plus the per-run estimator that applies the trimming policy.

use ndarray::stack;
use ndarray::Axis;
use ndarray_stats::CorrelationExt;
use ndarray_stats::SummaryStatisticsExt;
use tracing::debug;

use crate::error::FrontierError;
use crate::error::Result;
use crate::series::Instrument;
use crate::series::ReturnSeries;
use crate::series::TrimPolicy;

/// Geometric mean of the gross returns, minus one.
///
/// Computed as `exp(mean(ln g)) - 1`, which equals the n-th root of the product of
/// the gross returns minus one.
pub fn geometric_mean_return(series: &ReturnSeries) -> Result<f64> {
  if series.is_empty() {
    return Err(FrontierError::invalid_input(
      "geometric mean of an empty series",
    ));
  }

  if let Some(i) = series.gross().iter().position(|&g| g <= 0.0) {
    return Err(FrontierError::invalid_input(format!(
      "non-positive gross return {} at index {i}",
      series.gross()[i]
    )));
  }

  let gmean = series
    .gross()
    .geometric_mean()
    .map_err(|_| FrontierError::invalid_input("geometric mean of an empty series"))?;

  Ok(gmean - 1.0)
}

/// Sample variance (divisor `n - 1`) of the simple returns.
pub fn variance(series: &ReturnSeries) -> Result<f64> {
  if series.len() < 2 {
    return Err(FrontierError::invalid_input(format!(
      "variance needs at least 2 returns, got {}",
      series.len()
    )));
  }

  Ok(series.simple().var(1.0))
}

/// Sample covariance of two period-aligned series.
///
/// This is the off-diagonal entry of the 2x2 covariance matrix of the joint sample.
/// Series must have equal length and, when both carry period labels, identical
/// periods.
pub fn covariance(a: &ReturnSeries, b: &ReturnSeries) -> Result<f64> {
  if a.len() != b.len() {
    return Err(FrontierError::length_mismatch(a.len(), b.len()));
  }

  if let (Some(pa), Some(pb)) = (a.periods(), b.periods()) {
    if let Some(i) = pa.iter().zip(pb).position(|(x, y)| x != y) {
      return Err(FrontierError::alignment(format!(
        "period {i} differs: {} vs {}",
        pa[i], pb[i]
      )));
    }
  }

  if a.len() < 2 {
    return Err(FrontierError::invalid_input(format!(
      "covariance needs at least 2 aligned returns, got {}",
      a.len()
    )));
  }

  let joint = stack(Axis(0), &[a.gross().view(), b.gross().view()])
    .map_err(|e| FrontierError::alignment(e.to_string()))?;
  let cov = joint
    .cov(1.0)
    .map_err(|_| FrontierError::invalid_input("covariance of an empty sample"))?;

  Ok(cov[[0, 1]])
}

/// Mean and variance of one instrument, fixed once computed.
#[derive(Clone, Debug, PartialEq)]
pub struct InstrumentStats {
  pub symbol: String,
  pub geometric_mean_return: f64,
  pub variance: f64,
}

/// Covariance between the instruments at positions `first` and `second`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CovariancePair {
  pub first: usize,
  pub second: usize,
  pub covariance: f64,
}

/// Which window of each series feeds the covariance estimate.
///
/// Mean and variance always use the trimmed window. `Full` estimates covariance on
/// the untrimmed series and is the default, so existing risk figures stay
/// reproducible even though two windows are mixed in one number. `Trimmed` uses the
/// same window as mean and variance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CovarianceWindow {
  #[default]
  Full,
  Trimmed,
}

/// Applies a trimming policy and covariance window to a set of instruments.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatEstimator {
  pub trim: TrimPolicy,
  pub covariance_window: CovarianceWindow,
}

impl StatEstimator {
  pub fn new(trim: TrimPolicy, covariance_window: CovarianceWindow) -> Self {
    Self {
      trim,
      covariance_window,
    }
  }

  /// Geometric mean return and variance over the trimmed series.
  pub fn instrument_stats(&self, instrument: &Instrument) -> Result<InstrumentStats> {
    let trimmed = instrument.trimmed_series(&self.trim)?;
    let stats = InstrumentStats {
      symbol: instrument.symbol().to_string(),
      geometric_mean_return: geometric_mean_return(&trimmed)?,
      variance: variance(&trimmed)?,
    };

    debug!(
      symbol = %stats.symbol,
      periods = trimmed.len(),
      geometric_mean_return = stats.geometric_mean_return,
      variance = stats.variance,
      "instrument stats"
    );

    Ok(stats)
  }

  /// Covariance for every unordered pair `(i, j)`, `i < j`, in lexicographic order.
  pub fn covariance_pairs(&self, instruments: &[Instrument]) -> Result<Vec<CovariancePair>> {
    let series = instruments
      .iter()
      .map(|inst| match self.covariance_window {
        CovarianceWindow::Full => inst.return_series(),
        CovarianceWindow::Trimmed => inst.trimmed_series(&self.trim),
      })
      .collect::<Result<Vec<_>>>()?;

    let n = series.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for i in 0..n {
      for j in (i + 1)..n {
        let cov = covariance(&series[i], &series[j]).map_err(|e| match e {
          FrontierError::Alignment { message } => FrontierError::alignment(format!(
            "{} / {}: {message}",
            instruments[i].symbol(),
            instruments[j].symbol()
          )),
          other => other,
        })?;

        debug!(
          first = instruments[i].symbol(),
          second = instruments[j].symbol(),
          window = ?self.covariance_window,
          covariance = cov,
          "pair covariance"
        );

        pairs.push(CovariancePair {
          first: i,
          second: j,
          covariance: cov,
        });
      }
    }

    Ok(pairs)
  }
}
