//! Non-linear estimation of the blur proportionality coefficient κ.
//!
//! This crate hosts the photometric cost factor, pair enumeration and
//! role assignment, the single-parameter least-squares problem and its
//! Levenberg-Marquardt backend, and the diagnostic cost sweep. The
//! minimizer itself comes from the external `levenberg-marquardt` crate
//! and is consumed as a black box through [`NllsSolverBackend`].

pub mod backend_lm;
pub mod factors;
pub mod kappa;
pub mod pairing;
pub mod problem;
pub mod sweep;

pub use backend_lm::LmBackend;
pub use factors::relative_blur::RelativeBlurFactor;
pub use kappa::{optimize_kappa, KappaEstimate, RelativeBlurProblem, KAPPA_INIT};
pub use pairing::{build_factors, pair_cluster, ObservationPair};
pub use problem::{NllsProblem, NllsSolverBackend, SolveOptions, SolveReport, Termination};
pub use sweep::{sweep_cost_curve, CostSample, SweepRange};
