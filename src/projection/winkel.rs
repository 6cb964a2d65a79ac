//! Winkel Tripel projection
//!
//! The arithmetic mean of the Aitoff projection and the equirectangular
//! projection with standard parallel arccos(2/π).

use std::f64::consts::{FRAC_PI_2, PI};

use super::RawProjection;

/// Degrees between samples along the antimeridian outline
const OUTLINE_STEP: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct WinkelTripel;

impl RawProjection for WinkelTripel {
    fn forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let (ax, ay) = aitoff(lambda, phi);
        ((ax + lambda / FRAC_PI_2) / 2.0, (ay + phi) / 2.0)
    }

    fn outline(&self) -> Vec<(f64, f64)> {
        // East edge of the antimeridian from north to south, then the west
        // edge back up. The flat poles close the ring.
        let steps = (180.0 / OUTLINE_STEP) as usize;
        let mut ring = Vec::with_capacity(2 * steps + 3);
        for i in 0..=steps {
            let phi = (90.0 - i as f64 * OUTLINE_STEP).to_radians();
            ring.push((PI, phi));
        }
        for i in 0..=steps {
            let phi = (-90.0 + i as f64 * OUTLINE_STEP).to_radians();
            ring.push((-PI, phi));
        }
        ring.push(ring[0]);
        ring
    }
}

fn aitoff(lambda: f64, phi: f64) -> (f64, f64) {
    let cos_phi = phi.cos();
    let half_lambda = lambda / 2.0;
    let sincia = sinci((cos_phi * half_lambda.cos()).clamp(-1.0, 1.0).acos());
    (
        2.0 * cos_phi * half_lambda.sin() * sincia,
        phi.sin() * sincia,
    )
}

/// Unnormalised inverse sinc: `x / sin(x)`, with the limit 1 at zero
fn sinci(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        x / x.sin()
    }
}
