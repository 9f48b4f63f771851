//! Distance policies for equal-length color samples
//!
//! Two interchangeable policies: `redmean_distance` works directly on raw
//! RGBA bytes with a luminance-weighted channel formula (no conversion
//! cost, paid per comparison), `lab_distance` works on perceptual-space
//! vectors precomputed once per sample. An index must use one policy for
//! both its stored samples and its queries; the raw and perceptual forms
//! of a sample are never mixed within a search.

/// Luminance-weighted RGB distance between two raw RGBA samples
///
/// The "redmean" approximation: channel differences are weighted by the
/// average red level, which tracks perceived difference across the sRGB
/// gamut far better than plain Euclidean RGB distance. Per-pixel
/// distances are summed over the sample; alpha is ignored. Returns 0 for
/// pixel-identical samples.
pub fn redmean_distance(left: &[u8], right: &[u8]) -> f64 {
    let mut total = 0.0;
    for (lp, rp) in left.chunks_exact(4).zip(right.chunks_exact(4)) {
        let (lr, lg, lb) = match (lp.first(), lp.get(1), lp.get(2)) {
            (Some(&r), Some(&g), Some(&b)) => (f64::from(r), f64::from(g), f64::from(b)),
            _ => continue,
        };
        let (rr, rg, rb) = match (rp.first(), rp.get(1), rp.get(2)) {
            (Some(&r), Some(&g), Some(&b)) => (f64::from(r), f64::from(g), f64::from(b)),
            _ => continue,
        };

        let red_mean = (lr + rr) / 2.0;
        let dr = lr - rr;
        let dg = lg - rg;
        let db = lb - rb;

        let red_weight = 2.0 + red_mean / 256.0;
        let blue_weight = 2.0 + (255.0 - red_mean) / 256.0;
        total += (blue_weight * db)
            .mul_add(db, (red_weight * dr).mul_add(dr, 4.0 * dg * dg))
            .sqrt();
    }
    total
}

/// Mean per-pixel Euclidean distance between packed L*a*b* vectors
///
/// Both vectors carry three floats per pixel as produced by
/// [`rgba_to_lab`](crate::color::rgba_to_lab). Returns 0 for identical
/// vectors; the average keeps scores comparable across sample
/// resolutions.
pub fn lab_distance(left: &[f64], right: &[f64]) -> f64 {
    let pixels = left.len() / 3;
    if pixels == 0 {
        return 0.0;
    }

    let mut total = 0.0;
    for (lp, rp) in left.chunks_exact(3).zip(right.chunks_exact(3)) {
        let mut sum_squares = 0.0;
        for (l, r) in lp.iter().zip(rp.iter()) {
            let d = l - r;
            sum_squares = d.mul_add(d, sum_squares);
        }
        total += sum_squares.sqrt();
    }
    total / pixels as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_samples_have_zero_distance() {
        let sample = [10, 200, 30, 255, 60, 70, 80, 255];
        assert!(redmean_distance(&sample, &sample).abs() < f64::EPSILON);

        let lab = crate::color::rgba_to_lab(&sample);
        assert!(lab_distance(&lab, &lab).abs() < f64::EPSILON);
    }

    #[test]
    fn test_redmean_orders_by_similarity() {
        let red = [255, 0, 0, 255];
        let dark_red = [200, 0, 0, 255];
        let blue = [0, 0, 255, 255];

        let near = redmean_distance(&red, &dark_red);
        let far = redmean_distance(&red, &blue);
        assert!(near > 0.0);
        assert!(near < far);
    }
}
