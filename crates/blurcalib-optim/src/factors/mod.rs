//! Residual factor implementations.
//!
//! Factors bind the measurements of one comparable observation pair and
//! evaluate a scalar residual for a trial parameter value. They hold no
//! mutable state, so a fixed κ can be evaluated concurrently across the
//! whole factor set.

pub mod relative_blur;

pub use relative_blur::RelativeBlurFactor;
