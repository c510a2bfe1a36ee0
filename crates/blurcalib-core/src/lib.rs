//! Core data model for relative-blur calibration of multifocus plenoptic cameras.
//!
//! This crate contains:
//! - point observations and frame/cluster grouping ([`PointObservation`], [`ObservationIndex`]),
//! - grayscale frame images with sub-pixel patch extraction ([`GrayImage`], [`Patch`]),
//! - isotropic Gaussian blur on patches ([`gaussian_blur`]),
//! - micro-lens focus-type classification ([`LensTypeModel`], [`HexLensLayout`]).
//!
//! Feature detection, image loading and devignetting happen upstream; this
//! crate only organizes their outputs for the optimization layer.

pub mod blur;
pub mod image;
pub mod lens;
pub mod observation;

pub use blur::{gaussian_blur, gaussian_kernel};
pub use image::{GrayImage, ImageError, Patch, PatchSize};
pub use lens::{HexLensLayout, LensType, LensTypeModel};
pub use observation::{ClusterMap, Index, IndexError, ObservationIndex, PointObservation};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;
