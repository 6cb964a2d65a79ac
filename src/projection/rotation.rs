//! Spherical rotation applied before the raw projection.
//!
//! Angles follow the d3 convention: the first angle is added to longitude,
//! the second and third rotate about the y and x axes of the resulting frame.

use std::f64::consts::{PI, TAU};

/// A precomputed rotation of the sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    delta_lambda: f64,
    cos_delta_phi: f64,
    sin_delta_phi: f64,
    cos_delta_gamma: f64,
    sin_delta_gamma: f64,
    tilted: bool,
}

impl Rotation {
    /// Build a rotation from `[lambda, phi, gamma]` in degrees
    pub fn new(angles: [f64; 3]) -> Self {
        let delta_lambda = angles[0].to_radians() % TAU;
        let delta_phi = angles[1].to_radians();
        let delta_gamma = angles[2].to_radians();

        Self {
            delta_lambda,
            cos_delta_phi: delta_phi.cos(),
            sin_delta_phi: delta_phi.sin(),
            cos_delta_gamma: delta_gamma.cos(),
            sin_delta_gamma: delta_gamma.sin(),
            tilted: delta_phi != 0.0 || delta_gamma != 0.0,
        }
    }

    /// The rotation that leaves every point in place
    pub fn identity() -> Self {
        Self::new([0.0, 0.0, 0.0])
    }

    /// Rotate a point given in radians; the result is in radians
    pub fn forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let lambda = wrap_longitude(lambda + self.delta_lambda);
        if !self.tilted {
            return (lambda, phi);
        }

        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_delta_phi + x * self.sin_delta_phi;

        (
            (y * self.cos_delta_gamma - k * self.sin_delta_gamma)
                .atan2(x * self.cos_delta_phi - z * self.sin_delta_phi),
            (k * self.cos_delta_gamma + y * self.sin_delta_gamma)
                .clamp(-1.0, 1.0)
                .asin(),
        )
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

fn wrap_longitude(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - TAU
    } else if lambda < -PI {
        lambda + TAU
    } else {
        lambda
    }
}
