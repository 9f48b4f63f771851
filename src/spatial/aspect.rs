//! Reduced integer aspect ratios
//!
//! Every candidate image and every tile shape is described by its aspect
//! ratio in lowest integer terms. Sample resolutions are integer
//! multiples of these pairs, so equal ratios guarantee byte-compatible
//! sample shapes.

use crate::io::error::{Result, invalid_parameter};
use serde::{Deserialize, Serialize};
use std::fmt;

// Ratios a hand-held camera or screen plausibly produces; used to snap
// arbitrary target shapes when the nearest aspect mode is selected
const SANE_RATIOS: [AspectRatio; 3] = [
    AspectRatio { x: 1, y: 1 },
    AspectRatio { x: 4, y: 3 },
    AspectRatio { x: 16, y: 9 },
];

/// Greatest common divisor via the Euclidean algorithm
pub const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// A width:height pair in lowest integer terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AspectRatio {
    /// Horizontal component
    pub x: u32,
    /// Vertical component
    pub y: u32,
}

impl AspectRatio {
    /// Reduce pixel dimensions to their minimal aspect ratio
    pub const fn of(width: u32, height: u32) -> Self {
        let divisor = gcd(width, height);
        if divisor == 0 {
            return Self { x: width, y: height };
        }
        Self {
            x: width / divisor,
            y: height / divisor,
        }
    }

    /// Parse a `W:H` string such as `4:3`
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not two positive integers
    /// separated by a colon
    pub fn parse(text: &str) -> Result<Self> {
        let Some((x_text, y_text)) = text.split_once(':') else {
            return Err(invalid_parameter(
                "aspect-ratio",
                &text,
                &"expected a W:H pair such as 4:3",
            ));
        };
        let x: u32 = x_text
            .trim()
            .parse()
            .map_err(|e| invalid_parameter("aspect-ratio", &text, &format!("bad width: {e}")))?;
        let y: u32 = y_text
            .trim()
            .parse()
            .map_err(|e| invalid_parameter("aspect-ratio", &text, &format!("bad height: {e}")))?;
        if x == 0 || y == 0 {
            return Err(invalid_parameter(
                "aspect-ratio",
                &text,
                &"components must be positive",
            ));
        }
        Ok(Self::of(x, y))
    }

    /// The same ratio rotated a quarter turn
    pub const fn transpose(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }

    /// Whether width and height are equal
    pub const fn is_square(self) -> bool {
        self.x == self.y
    }

    /// Product of the reduced components
    pub const fn area(self) -> u32 {
        self.x * self.y
    }

    /// Concrete pixel size at an integer multiple
    ///
    /// Multiple 0 is special-cased to 1x1, the single-average-color
    /// sample resolution.
    pub const fn size_at(self, multiple: u32) -> (u32, u32) {
        if multiple == 0 {
            (1, 1)
        } else {
            (self.x * multiple, self.y * multiple)
        }
    }

    /// Snap to the nearest conventional ratio (1:1, 4:3, 16:9)
    ///
    /// Distance is measured on the long/short-side quotient, so the
    /// snap ignores orientation; the result keeps this ratio's own
    /// orientation.
    pub fn nearest_sane(self) -> Self {
        let long = f64::from(self.x.max(self.y));
        let short = f64::from(self.x.min(self.y)).max(1.0);
        let quotient = long / short;

        let mut nearest = self;
        let mut nearest_distance = f64::MAX;
        for sane in SANE_RATIOS {
            let sane_quotient = f64::from(sane.x) / f64::from(sane.y);
            let distance = (sane_quotient - quotient).abs();
            if distance < nearest_distance {
                nearest_distance = distance;
                nearest = sane;
            }
        }

        if self.y > self.x { nearest.transpose() } else { nearest }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}
