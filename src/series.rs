//! # Return Series
//!
//! $$
//! g_t = 1 + r_t,\qquad \tilde g = (g_{\ell}, \dots, g_{n-1-m})
//! $$
//!
//! Per-instrument price records and the gross-return series derived from them.

use chrono::NaiveDate;
use ndarray::s;
use ndarray::Array1;

use crate::error::FrontierError;
use crate::error::Result;

/// One row of an instrument's history.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceRecord {
  pub date: NaiveDate,
  pub symbol: String,
  pub close: f64,
  /// Gross return `1 + r` realized from this period to the next.
  pub forward_return: f64,
}

/// An instrument and its date-ordered history.
#[derive(Clone, Debug)]
pub struct Instrument {
  symbol: String,
  records: Vec<PriceRecord>,
}

impl Instrument {
  /// Build an instrument, checking that dates strictly ascend and every record
  /// carries the instrument's symbol.
  pub fn new(symbol: impl Into<String>, records: Vec<PriceRecord>) -> Result<Self> {
    let symbol = symbol.into();

    if let Some(bad) = records.iter().find(|r| r.symbol != symbol) {
      return Err(FrontierError::invalid_input(format!(
        "record dated {} has symbol '{}', expected '{}'",
        bad.date, bad.symbol, symbol
      )));
    }

    if let Some(w) = records.windows(2).find(|w| w[1].date <= w[0].date) {
      return Err(FrontierError::invalid_input(format!(
        "{symbol}: dates not strictly ascending at {} -> {}",
        w[0].date, w[1].date
      )));
    }

    Ok(Self { symbol, records })
  }

  pub fn symbol(&self) -> &str {
    &self.symbol
  }

  pub fn records(&self) -> &[PriceRecord] {
    &self.records
  }

  /// Full forward-return series, periods attached.
  pub fn return_series(&self) -> Result<ReturnSeries> {
    let periods = self.records.iter().map(|r| r.date).collect();
    let gross = self.records.iter().map(|r| r.forward_return).collect();
    ReturnSeries::with_periods(periods, gross)
  }

  /// Forward-return series with the boundary records removed.
  pub fn trimmed_series(&self, policy: &TrimPolicy) -> Result<ReturnSeries> {
    Ok(self.return_series()?.trim(policy))
  }
}

/// How many boundary periods are excluded from mean and variance estimates.
///
/// The default drops the first two records (warm-up) and the last one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrimPolicy {
  pub leading: usize,
  pub trailing: usize,
}

impl Default for TrimPolicy {
  fn default() -> Self {
    Self {
      leading: 2,
      trailing: 1,
    }
  }
}

/// Ordered gross returns, optionally labelled by period.
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnSeries {
  periods: Option<Vec<NaiveDate>>,
  gross: Array1<f64>,
}

impl ReturnSeries {
  /// Series of gross returns without period labels.
  pub fn from_gross(gross: Vec<f64>) -> Result<Self> {
    Self::validate(&gross)?;
    Ok(Self {
      periods: None,
      gross: Array1::from(gross),
    })
  }

  /// Series built from simple returns `r`, stored as `1 + r`.
  pub fn from_simple(simple: &[f64]) -> Result<Self> {
    Self::from_gross(simple.iter().map(|r| 1.0 + r).collect())
  }

  /// Series of gross returns labelled by period.
  pub fn with_periods(periods: Vec<NaiveDate>, gross: Vec<f64>) -> Result<Self> {
    if periods.len() != gross.len() {
      return Err(FrontierError::invalid_input(format!(
        "{} periods for {} returns",
        periods.len(),
        gross.len()
      )));
    }
    Self::validate(&gross)?;
    Ok(Self {
      periods: Some(periods),
      gross: Array1::from(gross),
    })
  }

  fn validate(gross: &[f64]) -> Result<()> {
    match gross.iter().position(|g| !g.is_finite()) {
      Some(i) => Err(FrontierError::invalid_input(format!(
        "non-finite return at index {i}"
      ))),
      None => Ok(()),
    }
  }

  pub fn len(&self) -> usize {
    self.gross.len()
  }

  pub fn is_empty(&self) -> bool {
    self.gross.is_empty()
  }

  pub fn periods(&self) -> Option<&[NaiveDate]> {
    self.periods.as_deref()
  }

  pub fn gross(&self) -> &Array1<f64> {
    &self.gross
  }

  pub fn simple(&self) -> Array1<f64> {
    self.gross.mapv(|g| g - 1.0)
  }

  /// Drop `policy.leading` entries from the front and `policy.trailing` from the
  /// back. A series too short to survive comes back empty.
  pub fn trim(&self, policy: &TrimPolicy) -> ReturnSeries {
    let n = self.len();
    let start = policy.leading.min(n);
    let end = n.saturating_sub(policy.trailing).max(start);

    ReturnSeries {
      periods: self.periods.as_ref().map(|p| p[start..end].to_vec()),
      gross: self.gross.slice(s![start..end]).to_owned(),
    }
  }
}
