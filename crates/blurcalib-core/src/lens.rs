//! Micro-lens focus-type classification from lattice coordinates.
//!
//! Multifocus plenoptic cameras interleave micro-lenses of different
//! focal lengths on one hexagonal lattice. Two observations carry
//! relative-blur information only if their lens types differ, so the
//! pairing stage needs a classifier for the lattice coordinates.

use serde::{Deserialize, Serialize};

use crate::observation::Index;

/// Focus type of the micro-lens behind one micro-image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LensType(pub u8);

/// Classifier mapping lattice coordinates to a lens focus type.
///
/// The camera's geometric calibration owns this mapping; implementations
/// adapt it to the pairing step without exposing the full parameter set.
pub trait LensTypeModel {
    fn lens_type(&self, k: Index, l: Index) -> LensType;
}

/// Cyclic tiling of a multifocus hexagonal micro-lens array.
///
/// Lens types repeat with period `num_types` along both lattice axes, so
/// `(k + l) mod num_types` recovers the type of any micro-lens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexLensLayout {
    pub num_types: u8,
}

impl HexLensLayout {
    pub fn new(num_types: u8) -> Self {
        debug_assert!(num_types > 0, "a lens layout needs at least one type");
        Self { num_types }
    }
}

/// Three interleaved focal lengths, the common multifocus configuration.
impl Default for HexLensLayout {
    fn default() -> Self {
        Self { num_types: 3 }
    }
}

impl LensTypeModel for HexLensLayout {
    fn lens_type(&self, k: Index, l: Index) -> LensType {
        let n = i64::from(self.num_types.max(1));
        let t = (i64::from(k) + i64::from(l)).rem_euclid(n);
        LensType(t as u8)
    }
}
