//! # Simplex Sampler
//!
//! $$
//! w_1\sim U[0,1),\quad w_i\sim U\Big[0,\,1-\sum_{j<i}w_j\Big),\quad w_k = 1-\sum_{j<k}w_j
//! $$
//!
//! Random long-only weight vectors for the frontier scatter.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rand_distr::Exp1;

use super::types::WeightVector;
use crate::error::FrontierError;
use crate::error::Result;

/// Grid resolution of [`SimplexSampling::Hundredths`].
const GRID: u32 = 100;

/// How weights are drawn on the simplex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimplexSampling {
  /// Stick-breaking on a grid of hundredths. Each draw takes an integer uniformly
  /// from `0..remaining` and the last asset receives the remainder, so it always
  /// holds at least 0.01.
  #[default]
  Hundredths,
  /// Continuous stick-breaking: each weight is uniform on `[0, remaining)`.
  StickBreaking,
  /// Normalized unit exponentials, i.e. Dirichlet(1, ..., 1). Uniform on the simplex.
  FlatDirichlet,
}

/// Draws batches of weight vectors from an injected random source.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeightSampler {
  method: SimplexSampling,
}

impl WeightSampler {
  pub fn new(method: SimplexSampling) -> Self {
    Self { method }
  }

  pub fn method(&self) -> SimplexSampling {
    self.method
  }

  /// Draw `n` weight vectors of dimension `k`.
  ///
  /// Fails with `InvalidParameter` if `n == 0` or `k < 2`. Consumes only `rng`.
  pub fn sample_simplex<R: Rng + ?Sized>(
    &self,
    k: usize,
    n: usize,
    rng: &mut R,
  ) -> Result<Vec<WeightVector>> {
    if k < 2 {
      return Err(FrontierError::invalid_parameter(format!(
        "simplex dimension must be at least 2, got {k}"
      )));
    }
    if n == 0 {
      return Err(FrontierError::invalid_parameter(
        "sample count must be positive",
      ));
    }

    (0..n).map(|_| self.draw(k, rng)).collect()
  }

  /// [`Self::sample_simplex`] with a `StdRng` seeded from `seed`.
  pub fn sample_simplex_seeded(&self, k: usize, n: usize, seed: u64) -> Result<Vec<WeightVector>> {
    let mut rng = StdRng::seed_from_u64(seed);
    self.sample_simplex(k, n, &mut rng)
  }

  fn draw<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Result<WeightVector> {
    let weights = match self.method {
      SimplexSampling::Hundredths => {
        let mut remaining = GRID;
        let mut w = Vec::with_capacity(k);
        for _ in 0..k - 1 {
          let x = rng.random_range(0..remaining);
          remaining -= x;
          w.push(x as f64 / GRID as f64);
        }
        w.push(remaining as f64 / GRID as f64);
        w
      }
      SimplexSampling::StickBreaking => {
        let mut remaining = 1.0;
        let mut w = Vec::with_capacity(k);
        for _ in 0..k - 1 {
          let x = rng.random::<f64>() * remaining;
          remaining -= x;
          w.push(x);
        }
        w.push(remaining.max(0.0));
        w
      }
      SimplexSampling::FlatDirichlet => {
        let e: Vec<f64> = (0..k).map(|_| rng.sample::<f64, _>(Exp1)).collect();
        let total: f64 = e.iter().sum();
        if total > 0.0 {
          e.iter().map(|x| x / total).collect()
        } else {
          vec![1.0 / k as f64; k]
        }
      }
    };

    WeightVector::new(weights)
  }
}

/// Draw `n` weight vectors of dimension `k` on the hundredths grid from a seeded
/// generator.
pub fn sample_simplex(k: usize, n: usize, seed: u64) -> Result<Vec<WeightVector>> {
  WeightSampler::default().sample_simplex_seeded(k, n, seed)
}

#[cfg(test)]
mod tests {
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use super::*;

  const METHODS: [SimplexSampling; 3] = [
    SimplexSampling::Hundredths,
    SimplexSampling::StickBreaking,
    SimplexSampling::FlatDirichlet,
  ];

  #[test]
  fn three_asset_weights_lie_on_simplex() {
    for method in METHODS {
      for n in [1, 7, 500] {
        let samples = WeightSampler::new(method)
          .sample_simplex_seeded(3, n, 17)
          .unwrap();
        assert_eq!(samples.len(), n);

        for w in &samples {
          assert_eq!(w.len(), 3);
          assert!(w.iter().all(|&x| (0.0..=1.0).contains(&x)), "{w:?}");
          let sum: f64 = w.iter().sum();
          assert!((sum - 1.0).abs() <= 1e-9, "{method:?} sum {sum}");
        }
      }
    }
  }

  #[test]
  fn same_seed_same_sequence() {
    for method in METHODS {
      let sampler = WeightSampler::new(method);
      let a = sampler.sample_simplex_seeded(3, 200, 42).unwrap();
      let b = sampler.sample_simplex_seeded(3, 200, 42).unwrap();
      assert_eq!(a, b);

      let c = sampler.sample_simplex_seeded(3, 200, 43).unwrap();
      assert_ne!(a, c);
    }
  }

  #[test]
  fn injected_rng_matches_seeded_helper() {
    let mut rng = StdRng::seed_from_u64(9);
    let injected = WeightSampler::default()
      .sample_simplex(3, 50, &mut rng)
      .unwrap();
    assert_eq!(injected, sample_simplex(3, 50, 9).unwrap());
  }

  #[test]
  fn hundredths_stay_on_grid() {
    let samples = sample_simplex(3, 1000, 5).unwrap();
    for w in &samples {
      for &x in w.iter() {
        let scaled = x * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9, "{x}");
      }
      assert!(w[0] <= 0.99);
      assert!(w[2] >= 0.01);
    }
  }

  #[test]
  fn higher_dimensions_are_supported() {
    for method in METHODS {
      let samples = WeightSampler::new(method)
        .sample_simplex_seeded(6, 100, 3)
        .unwrap();
      for w in &samples {
        assert_eq!(w.len(), 6);
        let sum: f64 = w.iter().sum();
        assert!((sum - 1.0).abs() <= 1e-9);
      }
    }
  }

  #[test]
  fn rejects_bad_parameters() {
    assert!(matches!(
      sample_simplex(3, 0, 1),
      Err(FrontierError::InvalidParameter { .. })
    ));
    assert!(matches!(
      sample_simplex(1, 10, 1),
      Err(FrontierError::InvalidParameter { .. })
    ));
    assert!(matches!(
      sample_simplex(0, 10, 1),
      Err(FrontierError::InvalidParameter { .. })
    ));
  }
}
