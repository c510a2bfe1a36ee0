//! Isotropic Gaussian blur on square patches.
//!
//! Separable two-pass convolution with a truncated kernel. Borders inside
//! the patch replicate the edge pixel, matching the sampler's boundary
//! policy.

use crate::image::Patch;
use crate::Real;

/// Kernel half-width in standard deviations; the tail beyond is dropped.
const KERNEL_TRUNCATION: Real = 3.0;

/// Normalized 1-D Gaussian kernel for the given standard deviation.
///
/// Returns `None` for `sigma <= 0`, the identity blur.
pub fn gaussian_kernel(sigma: Real) -> Option<Vec<Real>> {
    if sigma <= 0.0 {
        return None;
    }
    let radius = (KERNEL_TRUNCATION * sigma).ceil() as isize;
    let inv_two_sigma2 = 1.0 / (2.0 * sigma * sigma);
    let mut kernel = Vec::with_capacity(2 * radius as usize + 1);
    for i in -radius..=radius {
        let d = i as Real;
        kernel.push((-d * d * inv_two_sigma2).exp());
    }
    let norm: Real = kernel.iter().sum();
    for w in &mut kernel {
        *w /= norm;
    }
    Some(kernel)
}

/// Blur a patch with an isotropic Gaussian of standard deviation `sigma`.
///
/// `sigma <= 0` returns the patch unchanged.
pub fn gaussian_blur(patch: &Patch, sigma: Real) -> Patch {
    let Some(kernel) = gaussian_kernel(sigma) else {
        return patch.clone();
    };
    let n = patch.size();
    let radius = (kernel.len() / 2) as isize;
    let max = (n - 1) as isize;

    // horizontal pass
    let mut rows = vec![0.0; n * n];
    for y in 0..n {
        for x in 0..n {
            let mut acc = 0.0;
            for (t, w) in kernel.iter().enumerate() {
                let sx = (x as isize + t as isize - radius).clamp(0, max) as usize;
                acc += w * patch.data[y * n + sx];
            }
            rows[y * n + x] = acc;
        }
    }

    // vertical pass
    let mut data = vec![0.0; n * n];
    for y in 0..n {
        for x in 0..n {
            let mut acc = 0.0;
            for (t, w) in kernel.iter().enumerate() {
                let sy = (y as isize + t as isize - radius).clamp(0, max) as usize;
                acc += w * rows[sy * n + x];
            }
            data[y * n + x] = acc;
        }
    }

    Patch { size: n, data }
}
