//! Diagnostic cost-curve sweep over a κ grid.
//!
//! The sweep re-evaluates the converged functor store on a fixed grid so
//! the shape of the cost landscape (unimodality, noise floor) can be
//! inspected by eye. Nothing downstream consumes it.

use blurcalib_core::Real;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::factors::relative_blur::RelativeBlurFactor;

/// One `(κ, aggregate cost)` row of the diagnostic export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSample {
    pub kappa: Real,
    pub cost: Real,
}

/// Inclusive-start, exclusive-end κ grid with a fixed step.
///
/// Samples are generated by integer stepping, so two sweeps over the
/// same range produce bit-identical grids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub start: Real,
    pub end: Real,
    pub step: Real,
}

impl Default for SweepRange {
    fn default() -> Self {
        Self {
            start: 0.001,
            end: 2.0,
            step: 0.02,
        }
    }
}

impl SweepRange {
    /// Grid values `start + i * step` strictly below `end`.
    pub fn samples(&self) -> Vec<Real> {
        debug_assert!(self.step > 0.0, "sweep step must be positive");
        if self.step <= 0.0 || self.end <= self.start {
            return Vec::new();
        }
        (0..)
            .map(|i| self.start + self.step * i as Real)
            .take_while(|kappa| *kappa < self.end)
            .collect()
    }
}

/// Re-evaluate every functor over the κ grid, summing per grid point.
///
/// Grid points are evaluated in parallel; each point sums its residuals
/// sequentially so the aggregate is reproducible.
pub fn sweep_cost_curve(factors: &[RelativeBlurFactor], range: &SweepRange) -> Vec<CostSample> {
    let grid = range.samples();
    grid.par_iter()
        .map(|&kappa| {
            let cost = factors.iter().map(|f| f.evaluate(kappa)).sum();
            CostSample { kappa, cost }
        })
        .collect()
}
