//! # Pipeline
//!
//! $$
//! \{g^{(i)}\}_{i=1}^k \mapsto (\boldsymbol\mu,\Sigma) \mapsto \{(\mathbf w_m,\ \mathbf w_m^\top\Sigma\mathbf w_m,\ \mathbf w_m^\top\boldsymbol\mu)\}_{m=1}^N
//! $$
//!
//! One run: trim series, estimate statistics, sample weights, evaluate each sample.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::info;

use crate::error::FrontierError;
use crate::error::Result;
use crate::portfolio::efficient_frontier;
use crate::portfolio::PortfolioEvaluator;
use crate::portfolio::PortfolioSample;
use crate::portfolio::SimplexSampling;
use crate::portfolio::WeightSampler;
use crate::series::Instrument;
use crate::series::TrimPolicy;
use crate::stats::CovariancePair;
use crate::stats::CovarianceWindow;
use crate::stats::InstrumentStats;
use crate::stats::StatEstimator;

/// Runtime configuration for [`Pipeline`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PipelineConfig {
  /// Boundary periods excluded from mean and variance.
  pub trim: TrimPolicy,
  /// Window used for pairwise covariance.
  pub covariance_window: CovarianceWindow,
  /// Weight sampling scheme.
  pub sampling: SimplexSampling,
}

/// Everything a run produces, owned by the caller.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
  /// Per-instrument statistics, in input order.
  pub stats: Vec<InstrumentStats>,
  /// Covariance of every unordered instrument pair.
  pub covariances: Vec<CovariancePair>,
  /// Evaluated samples in generation order.
  pub samples: Vec<PortfolioSample>,
}

impl PipelineOutput {
  pub fn symbols(&self) -> Vec<&str> {
    self.stats.iter().map(|s| s.symbol.as_str()).collect()
  }

  /// Non-dominated samples, by ascending risk.
  pub fn frontier(&self) -> Vec<&PortfolioSample> {
    efficient_frontier(&self.samples)
  }
}

/// Orchestrates a frontier simulation over a fixed set of instruments.
///
/// Holds only configuration; every run owns its statistics and random state.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
  config: PipelineConfig,
}

impl Pipeline {
  pub fn new(config: PipelineConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &PipelineConfig {
    &self.config
  }

  /// Run with a `StdRng` seeded from `seed`.
  pub fn run(
    &self,
    instruments: &[Instrument],
    sample_count: usize,
    seed: u64,
  ) -> Result<PipelineOutput> {
    info!(
      instruments = instruments.len(),
      samples = sample_count,
      seed,
      "starting frontier run"
    );
    let mut rng = StdRng::seed_from_u64(seed);
    self.run_with_rng(instruments, sample_count, &mut rng)
  }

  /// Run drawing weights from `rng`. Any failing step aborts the run.
  pub fn run_with_rng<R: Rng + ?Sized>(
    &self,
    instruments: &[Instrument],
    sample_count: usize,
    rng: &mut R,
  ) -> Result<PipelineOutput> {
    if sample_count == 0 {
      return Err(FrontierError::invalid_parameter(
        "sample count must be positive",
      ));
    }
    if instruments.len() < 2 {
      return Err(FrontierError::invalid_parameter(format!(
        "need at least 2 instruments, got {}",
        instruments.len()
      )));
    }

    let estimator = StatEstimator::new(self.config.trim, self.config.covariance_window);
    let stats = instruments
      .iter()
      .map(|inst| estimator.instrument_stats(inst))
      .collect::<Result<Vec<_>>>()?;
    let covariances = estimator.covariance_pairs(instruments)?;

    let evaluator = PortfolioEvaluator::new(&stats, &covariances)?;
    let weights =
      WeightSampler::new(self.config.sampling).sample_simplex(stats.len(), sample_count, rng)?;
    let samples = weights
      .iter()
      .map(|w| evaluator.evaluate(w))
      .collect::<Result<Vec<_>>>()?;

    info!(
      samples = samples.len(),
      window = ?self.config.covariance_window,
      sampling = ?self.config.sampling,
      "frontier run complete"
    );

    Ok(PipelineOutput {
      stats,
      covariances,
      samples,
    })
  }

  /// Independent runs, one per seed, executed on the rayon pool.
  ///
  /// Output order follows `seeds`; each entry equals `run` with that seed.
  pub fn run_batches(
    &self,
    instruments: &[Instrument],
    sample_count: usize,
    seeds: &[u64],
  ) -> Result<Vec<PipelineOutput>> {
    seeds
      .par_iter()
      .map(|&seed| self.run(instruments, sample_count, seed))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use approx::assert_relative_eq;
  use chrono::Duration;
  use chrono::NaiveDate;
  use tracing_test::traced_test;

  use super::*;
  use crate::series::PriceRecord;

  fn instrument(symbol: &str, gross: &[f64]) -> Instrument {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let records = gross
      .iter()
      .enumerate()
      .map(|(i, &g)| PriceRecord {
        date: start + Duration::days(i as i64),
        symbol: symbol.to_string(),
        close: 1000.0,
        forward_return: g,
      })
      .collect();
    Instrument::new(symbol, records).unwrap()
  }

  // Trimmed windows are the reference series; boundary values are chosen so the
  // full-window covariances differ from the trimmed ones.
  fn reference_instruments() -> Vec<Instrument> {
    vec![
      instrument("BBCA", &[1.05, 0.97, 1.01, 0.98, 1.03, 1.10]),
      instrument("ITMG", &[0.96, 1.04, 1.00, 1.01, 0.99, 0.92]),
      instrument("MCAS", &[1.02, 1.02, 1.02, 1.00, 0.99, 1.00]),
    ]
  }

  #[test]
  fn end_to_end_statistics_match_reference() {
    let pipeline = Pipeline::new(PipelineConfig {
      covariance_window: CovarianceWindow::Trimmed,
      ..Default::default()
    });
    let out = pipeline.run(&reference_instruments(), 250, 7).unwrap();

    assert_eq!(out.symbols(), vec!["BBCA", "ITMG", "MCAS"]);
    assert_relative_eq!(
      out.stats[0].geometric_mean_return,
      0.0064562274227639715,
      max_relative = 1e-10
    );
    assert_abs_diff_eq!(out.stats[1].variance, 1e-4, epsilon = 1e-15);
    assert_abs_diff_eq!(out.covariances[0].covariance, -2.5e-4, epsilon = 1e-15);
    assert_abs_diff_eq!(out.covariances[2].covariance, 5e-5, epsilon = 1e-15);

    assert_eq!(out.samples.len(), 250);
    let evaluator = PortfolioEvaluator::new(&out.stats, &out.covariances).unwrap();
    for s in &out.samples {
      let again = evaluator.evaluate(&s.weights).unwrap();
      assert_eq!(again.risk, s.risk);
      assert_eq!(again.expected_return, s.expected_return);
      assert!(s.risk > -1e-15);
    }
  }

  #[test]
  fn default_window_uses_untrimmed_covariance() {
    let instruments = reference_instruments();
    let full = Pipeline::default().run(&instruments, 10, 1).unwrap();
    let trimmed = Pipeline::new(PipelineConfig {
      covariance_window: CovarianceWindow::Trimmed,
      ..Default::default()
    })
    .run(&instruments, 10, 1)
    .unwrap();

    assert_eq!(full.stats, trimmed.stats);
    let expected = crate::stats::covariance(
      &instruments[0].return_series().unwrap(),
      &instruments[1].return_series().unwrap(),
    )
    .unwrap();
    assert_abs_diff_eq!(full.covariances[0].covariance, expected, epsilon = 1e-18);
    assert!((full.covariances[0].covariance - trimmed.covariances[0].covariance).abs() > 1e-4);
    assert_ne!(full.samples, trimmed.samples);
  }

  #[test]
  fn zero_samples_is_invalid_parameter() {
    let err = Pipeline::default()
      .run(&reference_instruments(), 0, 1)
      .unwrap_err();
    assert!(matches!(err, FrontierError::InvalidParameter { .. }));
  }

  #[test]
  fn single_instrument_is_invalid_parameter() {
    let err = Pipeline::default()
      .run(&reference_instruments()[..1], 10, 1)
      .unwrap_err();
    assert!(matches!(err, FrontierError::InvalidParameter { .. }));
  }

  #[test]
  fn misaligned_instruments_abort_run() {
    let mut instruments = reference_instruments();
    instruments[2] = instrument("MCAS", &[1.02, 1.02, 1.02, 1.00, 0.99]);
    let err = Pipeline::default().run(&instruments, 10, 1).unwrap_err();
    assert!(matches!(err, FrontierError::Alignment { .. }));
  }

  #[test]
  fn short_history_aborts_run() {
    let instruments = vec![
      instrument("BBCA", &[1.01, 1.02, 1.03, 1.04]),
      instrument("ITMG", &[1.01, 1.02, 1.03, 1.04]),
    ];
    let err = Pipeline::default().run(&instruments, 10, 1).unwrap_err();
    assert!(matches!(err, FrontierError::InvalidInput { .. }));
  }

  #[test]
  fn same_seed_reproduces_run() {
    let instruments = reference_instruments();
    let a = Pipeline::default().run(&instruments, 100, 99).unwrap();
    let b = Pipeline::default().run(&instruments, 100, 99).unwrap();
    assert_eq!(a.samples, b.samples);
  }

  #[test]
  fn batches_match_individual_runs() {
    let instruments = reference_instruments();
    let pipeline = Pipeline::default();
    let seeds = [3, 1, 4, 1, 5];

    let batches = pipeline.run_batches(&instruments, 40, &seeds).unwrap();
    assert_eq!(batches.len(), seeds.len());
    for (out, &seed) in batches.iter().zip(&seeds) {
      let single = pipeline.run(&instruments, 40, seed).unwrap();
      assert_eq!(out.samples, single.samples);
    }
  }

  #[test]
  fn frontier_is_subset_of_samples() {
    let out = Pipeline::default()
      .run(&reference_instruments(), 300, 11)
      .unwrap();
    let frontier = out.frontier();
    assert!(!frontier.is_empty());
    for pair in frontier.windows(2) {
      assert!(pair[0].risk <= pair[1].risk);
      assert!(pair[0].expected_return < pair[1].expected_return);
    }
  }

  #[test]
  #[traced_test]
  fn run_is_logged() {
    Pipeline::default()
      .run(&reference_instruments(), 5, 2)
      .unwrap();
    assert!(logs_contain("starting frontier run"));
    assert!(logs_contain("frontier run complete"));
  }
}
