//! # Errors
//!
//! $$
//! \text{input}\to\{\text{InvalidInput},\ \text{Alignment},\ \text{InvalidParameter},\ \text{DimensionMismatch}\}
//! $$
//!
//! Every error is fatal to the current pipeline run.

use thiserror::Error;

/// Result type alias for frontier computations.
pub type Result<T> = std::result::Result<T, FrontierError>;

/// Error taxonomy of the statistics and sampling core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrontierError {
  /// Malformed or insufficient return series.
  #[error("Invalid input: {message}")]
  InvalidInput { message: String },

  /// Two series that must be paired period by period are not.
  #[error("Alignment error: {message}")]
  Alignment { message: String },

  /// Bad sampler or pipeline argument.
  #[error("Invalid parameter: {message}")]
  InvalidParameter { message: String },

  /// Weights, statistics and covariances disagree on the instrument count.
  #[error("Dimension mismatch: {message}")]
  DimensionMismatch { message: String },
}

impl FrontierError {
  /// Create an invalid input error.
  pub fn invalid_input(message: impl Into<String>) -> Self {
    Self::InvalidInput {
      message: message.into(),
    }
  }

  /// Create an alignment error.
  pub fn alignment(message: impl Into<String>) -> Self {
    Self::Alignment {
      message: message.into(),
    }
  }

  /// Create an alignment error for series of different length.
  pub fn length_mismatch(left: usize, right: usize) -> Self {
    Self::alignment(format!("series lengths differ: {left} vs {right}"))
  }

  /// Create an invalid parameter error.
  pub fn invalid_parameter(message: impl Into<String>) -> Self {
    Self::InvalidParameter {
      message: message.into(),
    }
  }

  /// Create a dimension mismatch error.
  pub fn dimension_mismatch(message: impl Into<String>) -> Self {
    Self::DimensionMismatch {
      message: message.into(),
    }
  }
}
