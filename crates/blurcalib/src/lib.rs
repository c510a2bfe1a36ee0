//! High-level entry crate for the `blurcalib-rs` toolbox.
//!
//! Estimates the blur proportionality coefficient κ of a multifocus
//! plenoptic camera. κ converts the geometric relative defocus radius
//! ρᵣ between two captures of one scene feature into the standard
//! deviation of the Gaussian blur relating their image patches, so a
//! host application can predict relative blur from geometry alone.
//!
//! ```no_run
//! use blurcalib::prelude::*;
//! use std::collections::BTreeMap;
//!
//! # fn main() -> anyhow::Result<()> {
//! let observations: Vec<PointObservation> = /* external feature detection */
//! # vec![];
//! let frames: BTreeMap<i32, GrayImage> = /* external loading + devignetting */
//! # BTreeMap::new();
//!
//! let report = calibrate_relative_blur(
//!     &observations,
//!     &frames,
//!     &HexLensLayout::default(),
//!     &RelativeBlurConfig::default(),
//! )?;
//! println!("kappa = {:.6}", report.coefficient.kappa);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - **[`core`]**: observations, frame images, patches, lens types
//! - **[`optim`]**: cost factors, pairing, the κ problem and solver backend
//! - **[`pipeline`]**: all-in-one calibration entry points and CSV export
//! - **[`prelude`]**: convenient re-exports

/// Observations, frame images, patches and lens classification.
pub mod core {
    pub use blurcalib_core::*;
}

/// Cost factors, pairing, the κ problem and the diagnostic sweep.
pub mod optim {
    pub use blurcalib_optim::*;
}

/// All-in-one calibration entry points and the cost-curve export.
pub mod pipeline {
    pub use blurcalib_pipeline::*;
}

/// Convenient re-exports for common use cases.
pub mod prelude {
    pub use crate::core::{
        GrayImage, HexLensLayout, LensType, LensTypeModel, ObservationIndex, Patch, PatchSize,
        PointObservation,
    };
    pub use crate::optim::{
        build_factors, optimize_kappa, sweep_cost_curve, CostSample, RelativeBlurFactor,
        RelativeBlurProblem, SolveOptions, SolveReport, SweepRange, Termination, KAPPA_INIT,
    };
    pub use crate::pipeline::{
        calibrate_and_export, calibrate_relative_blur, cost_curve_filename, export_cost_curve,
        BlurCoefficient, RelativeBlurConfig, RelativeBlurReport,
    };
}
