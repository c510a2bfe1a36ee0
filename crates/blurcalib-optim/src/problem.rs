//! Solver-facing problem and backend abstractions.
//!
//! The least-squares minimizer is an external dependency; these traits
//! are the narrow interface calibration problems implement against it.

use blurcalib_core::Real;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Relative parameter step used for the central-difference Jacobian.
const FD_RELATIVE_STEP: Real = 1e-6;

/// Generic dense non-linear least-squares problem.
pub trait NllsProblem {
    /// Number of parameters in the optimization vector.
    fn num_params(&self) -> usize;
    /// Number of residual rows in the problem.
    fn num_residuals(&self) -> usize;
    /// Residual vector for the given parameters.
    fn residuals(&self, x: &DVector<Real>) -> DVector<Real>;

    /// Central-difference Jacobian.
    ///
    /// Override when an analytic form is available; the photometric
    /// residuals here have none.
    fn jacobian(&self, x: &DVector<Real>) -> DMatrix<Real> {
        let mut jac = DMatrix::zeros(self.num_residuals(), self.num_params());
        for col in 0..self.num_params() {
            let step = FD_RELATIVE_STEP * (1.0 + x[col].abs());
            let mut forward = x.clone();
            let mut backward = x.clone();
            forward[col] += step;
            backward[col] -= step;
            let r_forward = self.residuals(&forward);
            let r_backward = self.residuals(&backward);
            let inv = 1.0 / (2.0 * step);
            for row in 0..self.num_residuals() {
                jac[(row, col)] = (r_forward[row] - r_backward[row]) * inv;
            }
        }
        jac
    }
}

/// Solver configuration mapped onto the backend's stopping criteria.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Iteration budget before the solver gives up.
    #[serde(default = "default_max_iters")]
    pub max_iters: usize,
    /// Relative tolerance on cost reduction.
    #[serde(default = "default_tol")]
    pub ftol: Real,
    /// Gradient orthogonality tolerance.
    #[serde(default = "default_tol")]
    pub gtol: Real,
    /// Relative tolerance on parameter updates.
    #[serde(default = "default_tol")]
    pub xtol: Real,
}

fn default_max_iters() -> usize {
    25
}

fn default_tol() -> Real {
    1e-12
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iters: default_max_iters(),
            ftol: default_tol(),
            gtol: default_tol(),
            xtol: default_tol(),
        }
    }
}

/// How a solver run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A stopping tolerance was met; the estimate is trustworthy.
    Converged,
    /// The iteration budget ran out before any tolerance was met.
    IterationLimit,
    /// The backend stopped without making progress.
    Diverged,
}

impl Termination {
    pub fn is_converged(self) -> bool {
        matches!(self, Termination::Converged)
    }
}

/// Outcome of one solver invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    /// Residual evaluations spent by the backend.
    pub iterations: usize,
    /// Final value of the objective, half the squared residual norm.
    pub final_cost: Real,
    pub termination: Termination,
}

/// Backend wrapper around an external dense least-squares minimizer.
pub trait NllsSolverBackend {
    fn solve<P: NllsProblem>(
        &self,
        problem: &P,
        x0: DVector<Real>,
        opts: &SolveOptions,
    ) -> (DVector<Real>, SolveReport);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Quadratic;

    impl NllsProblem for Quadratic {
        fn num_params(&self) -> usize {
            1
        }

        fn num_residuals(&self) -> usize {
            1
        }

        fn residuals(&self, x: &DVector<Real>) -> DVector<Real> {
            DVector::from_element(1, x[0] * x[0] - 4.0)
        }
    }

    #[test]
    fn central_difference_matches_the_analytic_derivative() {
        let problem = Quadratic;
        let x = DVector::from_element(1, 3.0);
        let jac = problem.jacobian(&x);
        // d/dx (x^2 - 4) = 2x = 6
        assert!((jac[(0, 0)] - 6.0).abs() < 1e-5);
    }

    #[test]
    fn solve_options_defaults_match_the_driver_policy() {
        let opts = SolveOptions::default();
        assert_eq!(opts.max_iters, 25);
        assert_eq!(opts.ftol, 1e-12);

        let de: SolveOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(de.max_iters, opts.max_iters);
        assert_eq!(de.xtol, opts.xtol);
    }

    #[test]
    fn termination_serde_uses_snake_case() {
        let json = serde_json::to_string(&Termination::IterationLimit).unwrap();
        assert_eq!(json, "\"iteration_limit\"");
        assert!(!Termination::Diverged.is_converged());
        assert!(Termination::Converged.is_converged());
    }
}
