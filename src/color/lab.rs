//! CIE L*a*b* perceptual color space
//!
//! Candidate samples are compared in L*a*b* because Euclidean distance
//! there tracks perceived color difference far better than distance in
//! gamma-encoded RGB. Conversion goes sRGB → linear RGB → XYZ (D65) →
//! L*a*b*, per IEC 61966-2-1 and CIE 15:2004.

// D65 reference white
const WHITE_X: f64 = 0.950_47;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.088_83;

// CIE 15:2004 section 8.2 constants: (6/29)^3 and the linear-segment slope
const EPSILON: f64 = 216.0 / 24_389.0;
const KAPPA: f64 = 24_389.0 / 27.0;

/// A color in CIE L*a*b* space, D65 white point.
///
/// Components follow the conventional scale: `l` in 0..=100 for in-gamut
/// colors, `a` and `b` roughly -128..=128. Values are not clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CieLab {
    /// Lightness: 0 (black) to 100 (white)
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
}

impl CieLab {
    /// Create a L*a*b* color from components
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Convert an 8-bit sRGB pixel (alpha ignored) to L*a*b*
    pub fn from_srgb8(r: u8, g: u8, b: u8) -> Self {
        let rl = srgb_to_linear(f64::from(r) / 255.0);
        let gl = srgb_to_linear(f64::from(g) / 255.0);
        let bl = srgb_to_linear(f64::from(b) / 255.0);

        // sRGB D65 linear-light to XYZ matrix
        let x = 0.180_437_5_f64.mul_add(bl, 0.412_456_4_f64.mul_add(rl, 0.357_576_1 * gl));
        let y = 0.072_175_f64.mul_add(bl, 0.212_672_9_f64.mul_add(rl, 0.715_152_2 * gl));
        let z = 0.950_304_1_f64.mul_add(bl, 0.019_333_9_f64.mul_add(rl, 0.119_192_0 * gl));

        let fx = lab_f(x / WHITE_X);
        let fy = lab_f(y / WHITE_Y);
        let fz = lab_f(z / WHITE_Z);

        Self {
            l: 116.0_f64.mul_add(fy, -16.0),
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    /// Euclidean distance to another L*a*b* color
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        db.mul_add(db, dl.mul_add(dl, da * da)).sqrt()
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        KAPPA.mul_add(t, 16.0) / 116.0
    }
}

/// Convert a packed RGBA byte sample to a packed L*a*b* vector
///
/// Produces three floats per pixel, `[l, a, b, l, a, b, ...]`, in pixel
/// order. Trailing bytes short of a full 4-byte pixel are ignored.
pub fn rgba_to_lab(bytes: &[u8]) -> Vec<f64> {
    let mut lab = Vec::with_capacity((bytes.len() / 4) * 3);
    for pixel in bytes.chunks_exact(4) {
        let (r, g, b) = match (pixel.first(), pixel.get(1), pixel.get(2)) {
            (Some(&r), Some(&g), Some(&b)) => (r, g, b),
            _ => continue,
        };
        let color = CieLab::from_srgb8(r, g, b);
        lab.push(color.l);
        lab.push(color.a);
        lab.push(color.b);
    }
    lab
}
