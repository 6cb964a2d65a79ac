//! Graticule generation
//!
//! Produces the meridians and parallels of a longitude/latitude grid as
//! lines in degrees. Major lines (every 90° of longitude, and the equator)
//! run pole to pole across the major extent; the remaining lines stop at
//! ±80° latitude so the poles do not fill up with converging meridians.
//! Parallels are sampled densely because they are not great circles.

use geo_types::{coord, LineString, MultiLineString};

const EPSILON: f64 = 1e-6;

/// A longitude/latitude grid definition
#[derive(Debug, Clone, PartialEq)]
pub struct Graticule {
    /// Minor step `(longitude, latitude)` in degrees
    pub step: (f64, f64),
    /// Major step `(longitude, latitude)` in degrees
    pub major_step: (f64, f64),
    /// Major extent `[[min_lon, min_lat], [max_lon, max_lat]]`
    pub extent_major: [[f64; 2]; 2],
    /// Minor extent `[[min_lon, min_lat], [max_lon, max_lat]]`
    pub extent_minor: [[f64; 2]; 2],
    /// Sampling interval along parallels, in degrees
    pub precision: f64,
}

impl Default for Graticule {
    fn default() -> Self {
        Self {
            step: (10.0, 10.0),
            major_step: (90.0, 360.0),
            extent_major: [[-180.0, -90.0 + EPSILON], [180.0, 90.0 - EPSILON]],
            extent_minor: [[-180.0, -80.0 - EPSILON], [180.0, 80.0 + EPSILON]],
            precision: 2.5,
        }
    }
}

impl Graticule {
    /// Create a graticule with the default 10° grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minor grid step
    pub fn with_step(mut self, lon: f64, lat: f64) -> Self {
        self.step = (lon, lat);
        self
    }

    /// Set the sampling interval along parallels
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// All grid lines: major meridians, major parallels, then the minor ones
    pub fn lines(&self) -> Vec<LineString<f64>> {
        let [[x0_major, y0_major], [x1_major, y1_major]] = self.extent_major;
        let [[x0, y0], [x1, y1]] = self.extent_minor;
        let (dx, dy) = self.step;
        let (dx_major, dy_major) = self.major_step;

        let mut lines = Vec::new();

        for x in range((x0_major / dx_major).ceil() * dx_major, x1_major, dx_major) {
            lines.push(meridian(x, y0_major, y1_major, 90.0));
        }
        for y in range((y0_major / dy_major).ceil() * dy_major, y1_major, dy_major) {
            lines.push(parallel(y, x0_major, x1_major, self.precision));
        }
        for x in range((x0 / dx).ceil() * dx, x1, dx) {
            if (x % dx_major).abs() > EPSILON {
                lines.push(meridian(x, y0, y1, 90.0));
            }
        }
        for y in range((y0 / dy).ceil() * dy, y1, dy) {
            if (y % dy_major).abs() > EPSILON {
                lines.push(parallel(y, x0, x1, self.precision));
            }
        }

        lines
    }

    /// The grid as a single multi-line geometry
    pub fn to_multi_line_string(&self) -> MultiLineString<f64> {
        MultiLineString::new(self.lines())
    }
}

/// `start, start + step, …` up to but excluding `stop`; empty unless
/// `step` is positive and finite
fn range(start: f64, stop: f64, step: f64) -> impl Iterator<Item = f64> {
    let n = if step > 0.0 && step.is_finite() {
        ((stop - start) / step).ceil().max(0.0) as usize
    } else {
        0
    };
    (0..n).map(move |i| start + i as f64 * step)
}

/// Samples from `from` to `to` (inclusive) every `step`; just the two ends
/// when `step` is unusable
fn samples(from: f64, to: f64, step: f64) -> Vec<f64> {
    let mut values: Vec<f64> = range(from, to - EPSILON, step).collect();
    if values.is_empty() {
        values.push(from);
    }
    values.push(to);
    values
}

fn meridian(x: f64, y0: f64, y1: f64, step: f64) -> LineString<f64> {
    samples(y0, y1, step)
        .into_iter()
        .map(|y| coord! { x: x, y: y })
        .collect()
}

fn parallel(y: f64, x0: f64, x1: f64, step: f64) -> LineString<f64> {
    samples(x0, x1, step)
        .into_iter()
        .map(|x| coord! { x: x, y: y })
        .collect()
}
