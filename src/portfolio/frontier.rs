//! # Efficient Frontier
//!
//! $$
//! \mathcal F=\{p : \nexists q,\ \sigma^2_q\le\sigma^2_p,\ \mu_q\ge\mu_p,\ q\ne p\}
//! $$
//!
//! Selection of non-dominated portfolios among sampled ones.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;

use super::types::PortfolioSample;

/// Samples on the upper-left boundary of the risk/return scatter, by ascending risk.
///
/// A sample is kept when its expected return is strictly above that of every
/// lower-risk sample. Among equal-risk samples only the best return can qualify.
pub fn efficient_frontier(samples: &[PortfolioSample]) -> Vec<&PortfolioSample> {
  let mut order: Vec<&PortfolioSample> = samples.iter().collect();
  order.sort_by_key(|s| {
    (
      OrderedFloat(s.risk),
      Reverse(OrderedFloat(s.expected_return)),
    )
  });

  let mut frontier = Vec::new();
  let mut best = f64::NEG_INFINITY;
  for s in order {
    if s.expected_return > best {
      best = s.expected_return;
      frontier.push(s);
    }
  }
  frontier
}

/// Least-risk sample, if any.
pub fn minimum_risk(samples: &[PortfolioSample]) -> Option<&PortfolioSample> {
  samples.iter().min_by_key(|s| OrderedFloat(s.risk))
}
