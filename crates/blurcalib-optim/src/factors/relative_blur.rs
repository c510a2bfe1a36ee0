//! Relative-blur photometric residual.

use blurcalib_core::{gaussian_blur, Patch, Real};

/// Photometric cost functor for one comparable observation pair.
///
/// The patch with the larger |ρ| is the blur target (`reference`); the
/// sharper capture (`defocused`) is synthetically blurred toward it at
/// every trial κ. Evaluation is a pure function of the trial value and
/// the state bound at construction.
#[derive(Debug, Clone)]
pub struct RelativeBlurFactor {
    reference: Patch,
    defocused: Patch,
    rho_r: Real,
}

impl RelativeBlurFactor {
    pub fn new(reference: Patch, defocused: Patch, rho_r: Real) -> Self {
        debug_assert_eq!(reference.size(), defocused.size(), "patch sizes must match");
        debug_assert!(rho_r >= 0.0, "relative radius must be non-negative");
        Self {
            reference,
            defocused,
            rho_r,
        }
    }

    /// Relative defocus radius bound at construction.
    pub fn rho_r(&self) -> Real {
        self.rho_r
    }

    /// Mean absolute photometric difference at the trial κ.
    ///
    /// Both patches are normalized to [0, 1], the defocused patch is
    /// blurred with `sigma = kappa * rho_r` (identity for `sigma <= 0`),
    /// and the residual is the per-pixel L1 difference averaged over the
    /// patch.
    pub fn evaluate(&self, kappa: Real) -> Real {
        let reference = self.reference.normalized();
        let defocused = self.defocused.normalized();

        let sigma = kappa * self.rho_r;
        let synthesized = gaussian_blur(&defocused, sigma);

        reference.mean_abs_diff(&synthesized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blurcalib_core::PatchSize;

    fn patch(size: usize, data: Vec<Real>) -> Patch {
        Patch::from_pixels(PatchSize::new(size).unwrap(), data).unwrap()
    }

    fn spike_patch(size: usize) -> Patch {
        let mut data = vec![20.0; size * size];
        data[(size * size) / 2] = 235.0;
        patch(size, data)
    }

    #[test]
    fn zero_kappa_compares_raw_normalized_patches() {
        let reference = patch(3, vec![255.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let defocused = patch(3, vec![0.0; 9]);
        let factor = RelativeBlurFactor::new(reference.clone(), defocused.clone(), 1.5);

        let expected = reference.normalized().mean_abs_diff(&defocused.normalized());
        assert_eq!(factor.evaluate(0.0), expected);
        assert!((factor.evaluate(0.0) - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn flat_field_has_zero_cost_for_any_kappa() {
        let flat = patch(9, vec![128.0; 81]);
        let factor = RelativeBlurFactor::new(flat.clone(), flat, 3.0_f64.sqrt());

        for kappa in [0.0, 0.3, 0.7, 1.4, 1.9] {
            assert!(
                factor.evaluate(kappa) < 1e-12,
                "flat field blurred is itself, cost {} at kappa {}",
                factor.evaluate(kappa),
                kappa
            );
        }
    }

    #[test]
    fn residual_vanishes_at_the_planted_kappa() {
        let sigma0 = 0.9;
        let rho_r = 1.8;
        let kappa_star = sigma0 / rho_r;

        let defocused = spike_patch(9);
        let reference = gaussian_blur(&defocused, sigma0);
        let factor = RelativeBlurFactor::new(reference, defocused, rho_r);

        assert!(
            factor.evaluate(kappa_star) < 1e-12,
            "cost at the planted kappa should vanish, got {}",
            factor.evaluate(kappa_star)
        );
    }

    #[test]
    fn cost_grows_away_from_the_planted_kappa() {
        let sigma0 = 0.9;
        let rho_r = 1.8;
        let kappa_star = sigma0 / rho_r;

        let defocused = spike_patch(9);
        let reference = gaussian_blur(&defocused, sigma0);
        let factor = RelativeBlurFactor::new(reference, defocused, rho_r);

        let at_star = factor.evaluate(kappa_star);
        assert!(factor.evaluate(kappa_star - 0.2) > at_star);
        assert!(factor.evaluate(kappa_star + 0.2) > at_star);
        assert!(factor.evaluate(kappa_star + 0.4) > factor.evaluate(kappa_star + 0.2));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let defocused = spike_patch(7);
        let reference = gaussian_blur(&defocused, 0.6);
        let factor = RelativeBlurFactor::new(reference, defocused, 1.2);

        let first = factor.evaluate(0.77);
        let second = factor.evaluate(0.77);
        assert_eq!(first, second);
    }
}
