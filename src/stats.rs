//! # Stats
//!
//! $$
//! \bar r_g = \Big(\prod_{t=1}^n g_t\Big)^{1/n} - 1,\qquad
//! \hat\sigma^2 = \frac{1}{n-1}\sum_t (r_t-\bar r)^2
//! $$
//!
//! Per-instrument return statistics and pairwise covariance.

pub mod estimator;

pub use estimator::covariance;
pub use estimator::geometric_mean_return;
pub use estimator::variance;
pub use estimator::CovariancePair;
pub use estimator::CovarianceWindow;
pub use estimator::InstrumentStats;
pub use estimator::StatEstimator;
