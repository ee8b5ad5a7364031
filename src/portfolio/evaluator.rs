//! # Portfolio Evaluator
//!
//! $$
//! \sigma_p^2=\sum_i w_i^2\sigma_i^2+2\sum_{i<j}w_iw_j\sigma_{ij}=\mathbf w^\top\Sigma\mathbf w,
//! \qquad \mu_p=\mathbf w^\top\boldsymbol\mu
//! $$
//!
//! Mean-variance risk and return of weight vectors.

use ndarray::Array1;
use ndarray::Array2;

use super::types::PortfolioSample;
use super::types::WeightVector;
use crate::error::FrontierError;
use crate::error::Result;
use crate::stats::CovariancePair;
use crate::stats::InstrumentStats;

/// Build the `k x k` covariance matrix from per-instrument variances and the
/// pairwise covariances.
///
/// Every unordered pair of distinct instruments must appear exactly once.
pub fn covariance_matrix(
  stats: &[InstrumentStats],
  pairs: &[CovariancePair],
) -> Result<Array2<f64>> {
  let k = stats.len();
  let expected = k * k.saturating_sub(1) / 2;
  if pairs.len() != expected {
    return Err(FrontierError::dimension_mismatch(format!(
      "{} covariance pairs for {k} instruments, expected {expected}",
      pairs.len()
    )));
  }

  let mut cov = Array2::<f64>::zeros((k, k));
  let mut seen = Array2::<bool>::from_elem((k, k), false);

  for (i, s) in stats.iter().enumerate() {
    cov[[i, i]] = s.variance;
  }

  for p in pairs {
    if p.first >= k || p.second >= k || p.first == p.second {
      return Err(FrontierError::dimension_mismatch(format!(
        "invalid covariance pair ({}, {}) for {k} instruments",
        p.first, p.second
      )));
    }
    if seen[[p.first, p.second]] {
      return Err(FrontierError::dimension_mismatch(format!(
        "covariance pair ({}, {}) given twice",
        p.first, p.second
      )));
    }

    seen[[p.first, p.second]] = true;
    seen[[p.second, p.first]] = true;
    cov[[p.first, p.second]] = p.covariance;
    cov[[p.second, p.first]] = p.covariance;
  }

  Ok(cov)
}

/// Evaluates weight vectors against a fixed set of statistics.
///
/// Inputs are validated once on construction, so evaluating many samples only checks
/// the weight dimension.
#[derive(Clone, Debug)]
pub struct PortfolioEvaluator {
  mu: Array1<f64>,
  cov: Array2<f64>,
}

impl PortfolioEvaluator {
  pub fn new(stats: &[InstrumentStats], pairs: &[CovariancePair]) -> Result<Self> {
    if stats.is_empty() {
      return Err(FrontierError::dimension_mismatch("no instrument statistics"));
    }

    let cov = covariance_matrix(stats, pairs)?;
    let mu = stats.iter().map(|s| s.geometric_mean_return).collect();

    Ok(Self { mu, cov })
  }

  /// Number of instruments.
  pub fn dim(&self) -> usize {
    self.mu.len()
  }

  pub fn covariance(&self) -> &Array2<f64> {
    &self.cov
  }

  pub fn evaluate(&self, weights: &WeightVector) -> Result<PortfolioSample> {
    if weights.len() != self.dim() {
      return Err(FrontierError::dimension_mismatch(format!(
        "{} weights for {} instruments",
        weights.len(),
        self.dim()
      )));
    }

    let w = weights.as_array();
    let risk = w.dot(&self.cov.dot(w));
    let expected_return = w.dot(&self.mu);

    Ok(PortfolioSample {
      weights: weights.clone(),
      risk,
      expected_return,
    })
  }
}

/// Risk and expected return of a single weight vector.
pub fn evaluate(
  weights: &WeightVector,
  stats: &[InstrumentStats],
  pairs: &[CovariancePair],
) -> Result<PortfolioSample> {
  PortfolioEvaluator::new(stats, pairs)?.evaluate(weights)
}
