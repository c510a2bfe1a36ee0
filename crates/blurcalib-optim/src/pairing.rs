//! Cross-type pair enumeration, role assignment and functor construction.

use std::collections::BTreeMap;

use anyhow::{ensure, Result};
use blurcalib_core::{
    GrayImage, Index, LensTypeModel, ObservationIndex, PatchSize, PointObservation, Real,
};
use rayon::prelude::*;

use crate::factors::relative_blur::RelativeBlurFactor;

/// A comparable pair: two captures of one scene feature through
/// micro-lenses of different focus type.
#[derive(Debug, Clone, Copy)]
pub struct ObservationPair {
    /// Blur target, the member with the larger |ρ|.
    pub reference: PointObservation,
    /// Sharper member, synthetically blurred toward the reference.
    pub defocused: PointObservation,
    /// Combined defocus magnitude `sqrt(|ρ₁² − ρ₂²|)`.
    pub rho_r: Real,
}

/// Enumerate every cross-type unordered pair in one cluster exactly once.
///
/// Upper-triangular enumeration guarantees the `n·(n−1)/2` count with no
/// reciprocal duplicates. Same-type pairs carry no relative-blur
/// information and are skipped without error.
pub fn pair_cluster(
    observations: &[PointObservation],
    model: &impl LensTypeModel,
) -> Vec<ObservationPair> {
    let mut pairs = Vec::new();
    for (i, &lhs) in observations.iter().enumerate() {
        for &rhs in &observations[i + 1..] {
            if model.lens_type(lhs.k, lhs.l) == model.lens_type(rhs.k, rhs.l) {
                continue;
            }
            let rho_r = (lhs.rho * lhs.rho - rhs.rho * rhs.rho).abs().sqrt();
            let (reference, defocused) = assign_roles(lhs, rhs);
            pairs.push(ObservationPair {
                reference,
                defocused,
                rho_r,
            });
        }
    }
    pairs
}

/// The larger |ρ| wins the reference role; ties go to the lower `(k, l)`
/// lattice coordinate so repeated runs agree.
fn assign_roles(
    lhs: PointObservation,
    rhs: PointObservation,
) -> (PointObservation, PointObservation) {
    let (la, ra) = (lhs.rho.abs(), rhs.rho.abs());
    if la > ra {
        (lhs, rhs)
    } else if ra > la {
        (rhs, lhs)
    } else if (lhs.k, lhs.l) <= (rhs.k, rhs.l) {
        (lhs, rhs)
    } else {
        (rhs, lhs)
    }
}

/// Build one photometric functor per comparable pair across all frames.
///
/// Each cluster depends only on its own observations and its frame's
/// image, so clusters run in parallel; the concatenated output order
/// stays deterministic.
pub fn build_factors(
    index: &ObservationIndex,
    frames: &BTreeMap<Index, GrayImage>,
    model: &(impl LensTypeModel + Sync),
    patch_size: PatchSize,
) -> Result<Vec<RelativeBlurFactor>> {
    for (frame, _) in index.frames() {
        ensure!(frames.contains_key(&frame), "no source image for frame {frame}");
    }

    let clusters: Vec<(&GrayImage, &[PointObservation])> = index
        .clusters()
        .map(|(frame, _cluster, obs)| (&frames[&frame], obs))
        .collect();

    let per_cluster: Vec<Vec<RelativeBlurFactor>> = clusters
        .par_iter()
        .map(|&(image, obs)| {
            pair_cluster(obs, model)
                .into_iter()
                .map(|pair| {
                    let reference =
                        image.extract_patch(pair.reference.u, pair.reference.v, patch_size);
                    let defocused =
                        image.extract_patch(pair.defocused.u, pair.defocused.v, patch_size);
                    RelativeBlurFactor::new(reference, defocused, pair.rho_r)
                })
                .collect()
        })
        .collect();

    Ok(per_cluster.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blurcalib_core::HexLensLayout;

    fn ob(rho: f64, k: Index, l: Index) -> PointObservation {
        PointObservation {
            u: 10.0,
            v: 10.0,
            rho,
            frame: 0,
            cluster: 0,
            k,
            l,
        }
    }

    #[test]
    fn cross_type_pairs_are_enumerated_exactly_once() {
        // two lenses of type 0, two of type 1: four cross pairs, two skipped
        let observations = vec![ob(1.0, 0, 0), ob(2.0, 3, 0), ob(1.5, 1, 0), ob(0.5, 4, 0)];
        let layout = HexLensLayout::default();

        let pairs = pair_cluster(&observations, &layout);
        assert_eq!(pairs.len(), 4);
        for pair in &pairs {
            assert_ne!(
                layout.lens_type(pair.reference.k, pair.reference.l),
                layout.lens_type(pair.defocused.k, pair.defocused.l)
            );
        }
    }

    #[test]
    fn same_type_clusters_yield_nothing() {
        let observations = vec![ob(1.0, 0, 0), ob(2.0, 3, 0), ob(3.0, 6, 0)];
        let pairs = pair_cluster(&observations, &HexLensLayout::default());
        assert!(pairs.is_empty());
    }

    #[test]
    fn reference_has_the_larger_defocus_magnitude() {
        let observations = vec![ob(-2.5, 0, 0), ob(1.0, 1, 0), ob(0.5, 2, 0)];
        let pairs = pair_cluster(&observations, &HexLensLayout::default());
        assert!(!pairs.is_empty());

        for pair in &pairs {
            assert!(pair.reference.rho.abs() >= pair.defocused.rho.abs());
            let expected =
                (pair.reference.rho.powi(2) - pair.defocused.rho.powi(2)).abs().sqrt();
            assert!((pair.rho_r - expected).abs() < 1e-12);
            assert!(pair.rho_r >= 0.0);
        }
    }

    #[test]
    fn equal_magnitudes_break_ties_on_lattice_order() {
        let a = ob(1.0, 2, 0);
        let b = ob(-1.0, 1, 0);
        let pairs = pair_cluster(&[a, b], &HexLensLayout::default());
        assert_eq!(pairs.len(), 1);
        // (1, 0) < (2, 0), so b takes the reference role
        assert_eq!(pairs[0].reference.k, 1);
        assert_eq!(pairs[0].defocused.k, 2);
        assert!(pairs[0].rho_r < 1e-12);
    }

    #[test]
    fn build_factors_requires_an_image_per_frame() {
        let observations = vec![ob(1.0, 0, 0), ob(2.0, 1, 0)];
        let index = ObservationIndex::from_observations(&observations).unwrap();
        let frames = BTreeMap::new();

        let err = build_factors(
            &index,
            &frames,
            &HexLensLayout::default(),
            PatchSize::DEFAULT,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no source image for frame 0"));
    }

    #[test]
    fn build_factors_extracts_one_functor_per_pair() {
        let observations = vec![ob(2.0, 0, 0), ob(1.0, 1, 0)];
        let index = ObservationIndex::from_observations(&observations).unwrap();

        let mut frames = BTreeMap::new();
        frames.insert(0, GrayImage::new(32, 32).unwrap());

        let factors = build_factors(
            &index,
            &frames,
            &HexLensLayout::default(),
            PatchSize::DEFAULT,
        )
        .unwrap();
        assert_eq!(factors.len(), 1);
        assert!((factors[0].rho_r() - 3.0_f64.sqrt()).abs() < 1e-12);
    }
}
