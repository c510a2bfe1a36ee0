//! All-in-one relative-blur calibration pipeline.
//!
//! Wires the observation index, pair enumeration, photometric functors,
//! the κ solver and the diagnostic sweep into a single call, and writes
//! the cost-curve artifact. Image loading, devignetting and feature
//! detection stay with external collaborators; this crate starts from
//! their outputs.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use blurcalib_core::{
    GrayImage, Index, LensTypeModel, ObservationIndex, PatchSize, PointObservation, Real,
};
use blurcalib_optim::{
    build_factors, optimize_kappa, sweep_cost_curve, CostSample, RelativeBlurProblem,
    SolveOptions, SweepRange, Termination, KAPPA_INIT,
};

/// Blur proportionality coefficient as stored in the camera parameter
/// bag: `sigma = kappa * rho_r`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlurCoefficient {
    pub kappa: Real,
}

/// Pipeline configuration with compile-time defaults for every knob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelativeBlurConfig {
    /// Edge length of the square patches extracted around each
    /// observation.
    #[serde(default)]
    pub patch_size: PatchSize,
    /// Starting value for the κ optimization.
    #[serde(default = "default_initial_kappa")]
    pub initial_kappa: Real,
    #[serde(default)]
    pub solve_opts: SolveOptions,
    #[serde(default)]
    pub sweep: SweepRange,
}

fn default_initial_kappa() -> Real {
    KAPPA_INIT
}

impl Default for RelativeBlurConfig {
    fn default() -> Self {
        Self {
            patch_size: PatchSize::DEFAULT,
            initial_kappa: KAPPA_INIT,
            solve_opts: SolveOptions::default(),
            sweep: SweepRange::default(),
        }
    }
}

/// Calibration outcome plus the diagnostic cost curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelativeBlurReport {
    pub coefficient: BlurCoefficient,
    pub final_cost: Real,
    pub iterations: usize,
    pub termination: Termination,
    pub num_factors: usize,
    pub cost_curve: Vec<CostSample>,
}

/// Estimate κ from point observations and their source frames.
///
/// Frames are keyed by the observation `frame` index and every observed
/// frame must have an image. The run aborts before optimization when
/// the observation set is empty or no comparable cross-type pair exists
/// in any cluster.
pub fn calibrate_relative_blur(
    observations: &[PointObservation],
    frames: &BTreeMap<Index, GrayImage>,
    lens_model: &(impl LensTypeModel + Sync),
    config: &RelativeBlurConfig,
) -> Result<RelativeBlurReport> {
    let index = ObservationIndex::from_observations(observations)?;
    debug!(
        "indexed {} observations across {} frames",
        index.num_observations(),
        index.num_frames()
    );

    let factors = build_factors(&index, frames, lens_model, config.patch_size)?;
    info!("built {} relative-blur functors", factors.len());

    let problem = RelativeBlurProblem::new(factors)?;
    let estimate = optimize_kappa(&problem, config.initial_kappa, &config.solve_opts);
    match estimate.report.termination {
        Termination::Converged => info!(
            "kappa = {:.6} (cost {:.3e}, {} evaluations)",
            estimate.kappa, estimate.report.final_cost, estimate.report.iterations
        ),
        Termination::IterationLimit => warn!(
            "iteration budget exhausted; kappa = {:.6} is best effort",
            estimate.kappa
        ),
        Termination::Diverged => warn!(
            "solver made no progress; kappa = {:.6} is best effort",
            estimate.kappa
        ),
    }

    let cost_curve = sweep_cost_curve(problem.factors(), &config.sweep);

    Ok(RelativeBlurReport {
        coefficient: BlurCoefficient {
            kappa: estimate.kappa,
        },
        final_cost: estimate.report.final_cost,
        iterations: estimate.report.iterations,
        termination: estimate.report.termination,
        num_factors: problem.num_factors(),
        cost_curve,
    })
}

/// Write the diagnostic cost curve as comma-separated `kappa,cost` rows.
pub fn export_cost_curve(path: &Path, samples: &[CostSample]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot open cost-curve file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "kappa,cost")?;
    for sample in samples {
        writeln!(out, "{},{}", sample.kappa, sample.cost)?;
    }
    Ok(())
}

/// Run-scoped filename for the cost-curve artifact.
pub fn cost_curve_filename() -> String {
    format!("costfunction-{}.csv", std::process::id())
}

/// Calibrate, then write the cost curve to a run-scoped file in `dir`.
///
/// The export is diagnostic output only: a write failure is logged and
/// the estimate is still returned.
pub fn calibrate_and_export(
    observations: &[PointObservation],
    frames: &BTreeMap<Index, GrayImage>,
    lens_model: &(impl LensTypeModel + Sync),
    config: &RelativeBlurConfig,
    dir: &Path,
) -> Result<RelativeBlurReport> {
    let report = calibrate_relative_blur(observations, frames, lens_model, config)?;
    let path: PathBuf = dir.join(cost_curve_filename());
    match export_cost_curve(&path, &report.cost_curve) {
        Ok(()) => info!("cost curve written to {}", path.display()),
        Err(err) => warn!("cost-curve export failed: {err:#}"),
    }
    Ok(report)
}
