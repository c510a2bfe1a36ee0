//! Single-parameter relative-blur estimation problem.

use anyhow::{ensure, Result};
use blurcalib_core::Real;
use nalgebra::DVector;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::backend_lm::LmBackend;
use crate::factors::relative_blur::RelativeBlurFactor;
use crate::problem::{NllsProblem, NllsSolverBackend, SolveOptions, SolveReport};

/// Empirical initial κ seed for multifocus plenoptic cameras.
pub const KAPPA_INIT: Real = 0.688818;

/// Dense least-squares problem over the shared functor store.
///
/// The store is the single owned collection both the solver and the
/// diagnostic sweep read, so patches are extracted exactly once per
/// pair.
#[derive(Debug, Clone)]
pub struct RelativeBlurProblem {
    factors: Vec<RelativeBlurFactor>,
}

impl RelativeBlurProblem {
    /// Wrap the functor store, rejecting an empty one before the solver
    /// can be invoked on it.
    pub fn new(factors: Vec<RelativeBlurFactor>) -> Result<Self> {
        ensure!(
            !factors.is_empty(),
            "no cross-type observation pairs found: nothing to calibrate"
        );
        Ok(Self { factors })
    }

    pub fn factors(&self) -> &[RelativeBlurFactor] {
        &self.factors
    }

    pub fn num_factors(&self) -> usize {
        self.factors.len()
    }
}

impl NllsProblem for RelativeBlurProblem {
    fn num_params(&self) -> usize {
        1
    }

    fn num_residuals(&self) -> usize {
        self.factors.len()
    }

    fn residuals(&self, x: &DVector<Real>) -> DVector<Real> {
        let kappa = x[0];
        let rows: Vec<Real> = self.factors.par_iter().map(|f| f.evaluate(kappa)).collect();
        DVector::from_vec(rows)
    }
}

/// Estimate plus the backend's report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KappaEstimate {
    pub kappa: Real,
    pub report: SolveReport,
}

/// Minimize the summed photometric cost over κ.
///
/// Iteration exhaustion is not an error here; inspect
/// [`SolveReport::termination`] to judge how trustworthy the estimate
/// is.
pub fn optimize_kappa(
    problem: &RelativeBlurProblem,
    initial_kappa: Real,
    opts: &SolveOptions,
) -> KappaEstimate {
    let backend = LmBackend;
    let x0 = DVector::from_element(1, initial_kappa);
    let (x_opt, report) = backend.solve(problem, x0, opts);
    KappaEstimate {
        kappa: x_opt[0],
        report,
    }
}
