//! # Portfolio
//!
//! $$
//! \sigma_p^2 = \mathbf{w}^\top \Sigma \mathbf{w}
//! $$
//!
//! Simplex sampling of long-only weights and their mean-variance evaluation.

pub mod evaluator;
pub mod frontier;
pub mod sampler;
pub mod types;

pub use evaluator::covariance_matrix;
pub use evaluator::evaluate;
pub use evaluator::PortfolioEvaluator;
pub use frontier::efficient_frontier;
pub use frontier::minimum_risk;
pub use sampler::sample_simplex;
pub use sampler::SimplexSampling;
pub use sampler::WeightSampler;
pub use types::PortfolioSample;
pub use types::WeightVector;
