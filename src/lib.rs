//! # portfolio-frontier
//!
//! $$
//! (\mathbf w,\ \mathbf w^\top\Sigma\mathbf w,\ \mathbf w^\top\boldsymbol\mu),\qquad \mathbf w\sim\Delta^{k-1}
//! $$
//!
//! Mean-variance statistics of a fixed set of instruments and a random scatter of
//! long-only portfolios for efficient-frontier plots.
//!
//! - [`stats`]: geometric mean return, sample variance, pairwise covariance
//! - [`portfolio`]: simplex weight sampling, risk/return evaluation, frontier selection
//! - [`pipeline`]: one seeded run from instrument histories to evaluated samples
//! - [`io`]: CSV adapter for price histories and sample tables

pub mod error;
pub mod io;
pub mod pipeline;
pub mod portfolio;
pub mod series;
pub mod stats;

pub use error::FrontierError;
pub use error::Result;
pub use pipeline::Pipeline;
pub use pipeline::PipelineConfig;
pub use pipeline::PipelineOutput;
pub use series::Instrument;
pub use series::PriceRecord;
pub use series::ReturnSeries;
pub use series::TrimPolicy;
