//! Projecting lines onto the canvas
//!
//! Straight segments between input vertices are great-circle arcs on the
//! sphere, so each one is adaptively resampled until the projected polyline
//! is within half a unit of the true curve. A segment that keeps spanning a
//! visible gap all the way down to the recursion limit crosses an
//! interruption of the projection (the antimeridian, or a cut between two
//! faces of a polyhedral net); the line is broken there.

use geo_types::{coord, Coord};

use super::Projection;

/// Squared distance tolerance in canvas units (precision 0.7)
const DELTA2: f64 = 0.49;

/// Maximum recursion depth when subdividing a segment
const MAX_DEPTH: u32 = 16;

/// Segments longer than 30° are always subdivided
const COS_MIN_DISTANCE: f64 = 0.866_025_403_784_438_6;

const EPSILON: f64 = 1e-6;

/// A projected point together with its position on the rotated sphere
#[derive(Debug, Clone, Copy)]
struct Sample {
    x: f64,
    y: f64,
    lambda: f64,
    cart: [f64; 3],
}

impl Sample {
    fn new(projection: &Projection, lambda: f64, phi: f64) -> Self {
        let (x, y) = projection.project_rotated(lambda, phi);
        let cos_phi = phi.cos();
        Self {
            x,
            y,
            lambda,
            cart: [cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin()],
        }
    }
}

/// Collects polylines, starting a new one at every interruption
#[derive(Debug, Default)]
struct LineSink {
    lines: Vec<Vec<(f64, f64)>>,
    current: Vec<(f64, f64)>,
}

impl LineSink {
    fn push(&mut self, x: f64, y: f64) {
        self.current.push((x, y));
    }

    fn interrupt(&mut self) {
        let line = std::mem::take(&mut self.current);
        if line.len() >= 2 {
            self.lines.push(line);
        }
    }

    fn finish(mut self) -> Vec<Vec<(f64, f64)>> {
        self.interrupt();
        self.lines
    }
}

/// Project a sequence of lon/lat vertices (degrees) into canvas polylines
pub(crate) fn stream_line(projection: &Projection, coords: &[Coord<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut sink = LineSink::default();
    let mut previous: Option<Sample> = None;

    for c in coords {
        let (lambda, phi) = projection.rotate_point(c.x, c.y);
        let sample = Sample::new(projection, lambda, phi);
        if let Some(prev) = previous {
            resample(projection, &prev, &sample, MAX_DEPTH, &mut sink);
        }
        sink.push(sample.x, sample.y);
        previous = Some(sample);
    }

    sink.finish()
}

/// Emit the points strictly between `p0` and `p1`
fn resample(projection: &Projection, p0: &Sample, p1: &Sample, depth: u32, sink: &mut LineSink) {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let d2 = dx * dx + dy * dy;
    if d2 <= 4.0 * DELTA2 {
        return;
    }
    if depth == 0 {
        sink.interrupt();
        return;
    }

    let a = p0.cart[0] + p1.cart[0];
    let b = p0.cart[1] + p1.cart[1];
    let c = p0.cart[2] + p1.cart[2];
    let m = (a * a + b * b + c * c).sqrt();
    if m < EPSILON {
        // Antipodal endpoints: the arc between them is undefined
        sink.interrupt();
        return;
    }

    let phi2 = (c / m).clamp(-1.0, 1.0).asin();
    let lambda2 = if ((c / m).abs() - 1.0).abs() < EPSILON || (p0.lambda - p1.lambda).abs() < EPSILON {
        (p0.lambda + p1.lambda) / 2.0
    } else {
        b.atan2(a)
    };
    let p2 = Sample::new(projection, lambda2, phi2);

    let dx2 = p2.x - p0.x;
    let dy2 = p2.y - p0.y;
    let dz = dy * dx2 - dx * dy2;
    let cos_distance =
        p0.cart[0] * p1.cart[0] + p0.cart[1] * p1.cart[1] + p0.cart[2] * p1.cart[2];

    if dz * dz / d2 > DELTA2
        || ((dx * dx2 + dy * dy2) / d2 - 0.5).abs() > 0.3
        || cos_distance < COS_MIN_DISTANCE
    {
        resample(projection, p0, &p2, depth - 1, sink);
        sink.push(p2.x, p2.y);
        resample(projection, &p2, p1, depth - 1, sink);
    }
}

/// Points along the great circle from `a` to `b` (lon/lat degrees),
/// both ends included
pub(crate) fn great_circle(a: Coord<f64>, b: Coord<f64>, segments: usize) -> Vec<Coord<f64>> {
    let pa = to_cartesian(a);
    let pb = to_cartesian(b);
    let d = (pa[0] * pb[0] + pa[1] * pb[1] + pa[2] * pb[2])
        .clamp(-1.0, 1.0)
        .acos();
    if d < EPSILON || segments == 0 {
        return vec![a, b];
    }

    let k = d.sin();
    (0..=segments)
        .map(|i| {
            let t = d * i as f64 / segments as f64;
            let wa = (d - t).sin() / k;
            let wb = t.sin() / k;
            let x = wa * pa[0] + wb * pb[0];
            let y = wa * pa[1] + wb * pb[1];
            let z = wa * pa[2] + wb * pb[2];
            coord! {
                x: y.atan2(x).to_degrees(),
                y: z.atan2(x.hypot(y)).to_degrees(),
            }
        })
        .collect()
}

fn to_cartesian(c: Coord<f64>) -> [f64; 3] {
    let lambda = c.x.to_radians();
    let phi = c.y.to_radians();
    let cos_phi = phi.cos();
    [cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin()]
}
