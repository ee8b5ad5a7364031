//! # Portfolio Types
//!
//! $$
//! \mathbf{w}\in\Delta^{k-1}=\{\mathbf{w}\in\mathbb R^k_{\ge 0} : \textstyle\sum_i w_i = 1\}
//! $$
//!
//! Weight vectors and evaluated portfolio samples.

use std::ops::Index;

use ndarray::Array1;

use crate::error::FrontierError;
use crate::error::Result;

/// Tolerance on the component sum of a [`WeightVector`].
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Long-only portfolio weights summing to one.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightVector(Array1<f64>);

impl WeightVector {
  /// Validate and wrap a set of weights.
  pub fn new(weights: Vec<f64>) -> Result<Self> {
    if weights.is_empty() {
      return Err(FrontierError::invalid_parameter("empty weight vector"));
    }

    if let Some(i) = weights.iter().position(|w| !w.is_finite() || *w < 0.0) {
      return Err(FrontierError::invalid_parameter(format!(
        "weight {i} is {}, expected a finite non-negative value",
        weights[i]
      )));
    }

    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
      return Err(FrontierError::invalid_parameter(format!(
        "weights sum to {sum}, expected 1"
      )));
    }

    Ok(Self(Array1::from(weights)))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn as_array(&self) -> &Array1<f64> {
    &self.0
  }

  pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
    self.0.iter()
  }

  pub fn to_vec(&self) -> Vec<f64> {
    self.0.to_vec()
  }
}

impl Index<usize> for WeightVector {
  type Output = f64;

  fn index(&self, i: usize) -> &f64 {
    &self.0[i]
  }
}

/// One sampled portfolio with its mean-variance figures.
#[derive(Clone, Debug, PartialEq)]
pub struct PortfolioSample {
  pub weights: WeightVector,
  /// Portfolio return variance `w' Σ w`.
  pub risk: f64,
  /// Weighted geometric mean return `w' μ`.
  pub expected_return: f64,
}

impl PortfolioSample {
  /// Standard deviation of the portfolio return.
  pub fn volatility(&self) -> f64 {
    self.risk.max(0.0).sqrt()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn weight_vector_validates_simplex() {
    assert!(WeightVector::new(vec![0.5, 0.3, 0.2]).is_ok());
    assert!(matches!(
      WeightVector::new(vec![0.5, 0.6]),
      Err(FrontierError::InvalidParameter { .. })
    ));
    assert!(matches!(
      WeightVector::new(vec![1.2, -0.2]),
      Err(FrontierError::InvalidParameter { .. })
    ));
    assert!(matches!(
      WeightVector::new(vec![]),
      Err(FrontierError::InvalidParameter { .. })
    ));
  }

  #[test]
  fn volatility_is_root_of_risk() {
    let sample = PortfolioSample {
      weights: WeightVector::new(vec![1.0]).unwrap(),
      risk: 0.04,
      expected_return: 0.01,
    };
    assert!((sample.volatility() - 0.2).abs() < 1e-15);
  }
}
