//! Amplitude - magnitude and phase attached to a proposal
//!
//! Addition is the vector sum of `magnitude * (cos phase, sin phase)`, so
//! proposals in phase reinforce and opposed ones cancel. Multiplication
//! multiplies magnitudes and adds phases.

use std::f64::consts::TAU;
use std::iter::Sum;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// Below this a vector sum is treated as fully cancelled
const CANCEL_EPSILON: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Amplitude {
    pub magnitude: f64,
    /// Radians in [0, 2pi)
    pub phase: f64,
}

impl Amplitude {
    pub const ZERO: Amplitude = Amplitude {
        magnitude: 0.0,
        phase: 0.0,
    };

    pub fn new(magnitude: f64, phase: f64) -> Self {
        Self {
            magnitude,
            phase: normalize_phase(phase),
        }
    }

    pub fn from_cartesian(re: f64, im: f64) -> Self {
        let magnitude = re.hypot(im);
        if magnitude < CANCEL_EPSILON {
            return Self::ZERO;
        }
        Self::new(magnitude, im.atan2(re))
    }

    pub fn to_cartesian(self) -> (f64, f64) {
        (
            self.magnitude * self.phase.cos(),
            self.magnitude * self.phase.sin(),
        )
    }
}

impl Default for Amplitude {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Amplitude {
    type Output = Amplitude;

    fn add(self, other: Amplitude) -> Amplitude {
        let (a_re, a_im) = self.to_cartesian();
        let (b_re, b_im) = other.to_cartesian();
        Amplitude::from_cartesian(a_re + b_re, a_im + b_im)
    }
}

impl Mul for Amplitude {
    type Output = Amplitude;

    fn mul(self, other: Amplitude) -> Amplitude {
        Amplitude::new(self.magnitude * other.magnitude, self.phase + other.phase)
    }
}

impl Sum for Amplitude {
    fn sum<I: Iterator<Item = Amplitude>>(iter: I) -> Amplitude {
        let (re, im) = iter
            .map(Amplitude::to_cartesian)
            .fold((0.0, 0.0), |(re, im), (a, b)| (re + a, im + b));
        Amplitude::from_cartesian(re, im)
    }
}

/// Wrap an angle into [0, 2pi)
pub fn normalize_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_in_phase_reinforces() {
        let sum = Amplitude::new(0.5, 1.0) + Amplitude::new(0.25, 1.0);
        assert!((sum.magnitude - 0.75).abs() < EPS);
        assert!((sum.phase - 1.0).abs() < EPS);
    }

    #[test]
    fn test_opposed_phase_cancels() {
        let sum = Amplitude::new(0.8, 0.0) + Amplitude::new(0.8, PI);
        assert!(sum.magnitude < EPS);
    }

    #[test]
    fn test_quadrature_sum() {
        let sum = Amplitude::new(3.0, 0.0) + Amplitude::new(4.0, FRAC_PI_2);
        assert!((sum.magnitude - 5.0).abs() < EPS);
    }

    #[test]
    fn test_multiplication() {
        let product = Amplitude::new(0.5, 3.0) * Amplitude::new(0.5, 4.0);
        assert!((product.magnitude - 0.25).abs() < EPS);
        assert!((product.phase - (7.0 - TAU)).abs() < EPS);
    }

    #[test]
    fn test_sum_matches_fold() {
        let parts = [
            Amplitude::new(1.0, 0.0),
            Amplitude::new(0.7, 0.5),
            Amplitude::new(0.3, 2.0),
        ];
        let summed: Amplitude = parts.iter().copied().sum();
        let folded = parts[0] + parts[1] + parts[2];
        assert!((summed.magnitude - folded.magnitude).abs() < EPS);
        assert!((summed.phase - folded.phase).abs() < EPS);
    }

    #[test]
    fn test_normalize_phase() {
        assert!((normalize_phase(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < EPS);
        assert!(normalize_phase(TAU) < EPS);
        assert!(normalize_phase(-1e-18) < TAU);
    }
}
