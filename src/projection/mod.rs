//! Cartographic projections
//!
//! A [`Projection`] wraps a raw projection (radians in, unit-sphere plane
//! coordinates out) with the usual map controls: a spherical rotation
//! applied first, then a uniform scale and a translation into canvas space.
//! Canvas y grows downward.
//!
//! Only two raw projections are provided: Winkel Tripel and the Waterman
//! butterfly. [`setup_projection`] selects one by identifier and
//! [`fit_bounds`] zooms it onto a geographic rectangle.

pub mod rotation;
pub mod setup;
pub mod stream;
pub mod waterman;
pub mod winkel;

use std::fmt;
use std::str::FromStr;

use geo_types::{coord, LineString, Rect};

use crate::error::RenderError;

pub use rotation::Rotation;
pub use setup::{bounding_box_polygon, fit_bounds, setup_projection};
pub use waterman::WatermanButterfly;
pub use winkel::WinkelTripel;

/// Scale a fresh projection starts with
pub const DEFAULT_SCALE: f64 = 150.0;

/// Segments per edge when measuring the projected extent of a ring
const BOUNDS_SEGMENTS: usize = 64;

/// A projection from the (rotated) unit sphere onto the plane
pub trait RawProjection: fmt::Debug {
    /// Project a point given in radians. The result has y pointing up.
    fn forward(&self, lambda: f64, phi: f64) -> (f64, f64);

    /// Closed ring of points (radians, in the rotated frame) tracing the
    /// edge of the projected globe
    fn outline(&self) -> Vec<(f64, f64)>;
}

/// Supported projection families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionKind {
    /// Waterman butterfly (`WB`)
    WatermanButterfly,
    /// Winkel Tripel (`W3`)
    WinkelTripel,
}

impl ProjectionKind {
    /// Short identifier used in configuration
    pub fn code(&self) -> &'static str {
        match self {
            ProjectionKind::WatermanButterfly => "WB",
            ProjectionKind::WinkelTripel => "W3",
        }
    }

    /// Scale that fits the whole globe on a canvas of the given width
    pub fn default_scale(&self, canvas_width: f64) -> f64 {
        match self {
            ProjectionKind::WatermanButterfly => canvas_width / 10.0,
            ProjectionKind::WinkelTripel => canvas_width / 6.0,
        }
    }

    fn raw(&self) -> Box<dyn RawProjection> {
        match self {
            ProjectionKind::WatermanButterfly => Box::new(WatermanButterfly::new()),
            ProjectionKind::WinkelTripel => Box::new(WinkelTripel),
        }
    }
}

impl FromStr for ProjectionKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("WB") {
            Ok(ProjectionKind::WatermanButterfly)
        } else if s.eq_ignore_ascii_case("W3") {
            Ok(ProjectionKind::WinkelTripel)
        } else {
            Err(RenderError::unsupported_projection(s))
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A configured projection: rotation, raw projection, scale and translation
#[derive(Debug)]
pub struct Projection {
    kind: ProjectionKind,
    raw: Box<dyn RawProjection>,
    angles: [f64; 3],
    rotation: Rotation,
    scale: f64,
    translate: (f64, f64),
}

impl Projection {
    /// Create a projection with no rotation, scale 150 and no translation
    pub fn new(kind: ProjectionKind) -> Self {
        Self {
            kind,
            raw: kind.raw(),
            angles: [0.0, 0.0, 0.0],
            rotation: Rotation::identity(),
            scale: DEFAULT_SCALE,
            translate: (0.0, 0.0),
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// Rotation angles `[lambda, phi, gamma]` in degrees
    pub fn rotation(&self) -> [f64; 3] {
        self.angles
    }

    pub fn set_rotation(&mut self, angles: [f64; 3]) {
        self.angles = angles;
        self.rotation = Rotation::new(angles);
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn translate(&self) -> (f64, f64) {
        self.translate
    }

    pub fn set_translate(&mut self, x: f64, y: f64) {
        self.translate = (x, y);
    }

    /// Set the rotation angles
    pub fn with_rotation(mut self, angles: [f64; 3]) -> Self {
        self.set_rotation(angles);
        self
    }

    /// Set the scale
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the translation
    pub fn with_translate(mut self, x: f64, y: f64) -> Self {
        self.translate = (x, y);
        self
    }

    /// Project a geographic point (degrees) to canvas coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (lambda, phi) = self.rotate_point(lon, lat);
        self.project_rotated(lambda, phi)
    }

    /// Rotate a geographic point (degrees); the result is in radians
    pub(crate) fn rotate_point(&self, lon: f64, lat: f64) -> (f64, f64) {
        self.rotation.forward(lon.to_radians(), lat.to_radians())
    }

    /// Project a point that is already in the rotated frame (radians)
    pub(crate) fn project_rotated(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let (x, y) = self.raw.forward(lambda, phi);
        (
            self.translate.0 + x * self.scale,
            self.translate.1 - y * self.scale,
        )
    }

    /// Canvas outline of the whole globe as a closed ring
    pub fn sphere_outline(&self) -> Vec<(f64, f64)> {
        self.raw
            .outline()
            .into_iter()
            .map(|(lambda, phi)| self.project_rotated(lambda, phi))
            .collect()
    }

    /// Project a line (lon/lat degrees) into canvas polylines, resampled
    /// along great circles and split wherever the projection is interrupted
    pub fn project_line(&self, line: &LineString<f64>) -> Vec<Vec<(f64, f64)>> {
        stream::stream_line(self, &line.0)
    }

    /// Canvas bounding box of a ring whose edges follow great circles
    pub fn bounds(&self, ring: &LineString<f64>) -> Option<Rect<f64>> {
        let mut points = ring
            .0
            .windows(2)
            .flat_map(|edge| stream::great_circle(edge[0], edge[1], BOUNDS_SEGMENTS))
            .map(|c| self.project(c.x, c.y));

        let first = points.next()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.0, first.1, first.0, first.1);
        for (x, y) in points {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        Some(Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 }))
    }

    /// Choose scale and translation so that `ring` fills `extent`,
    /// centred along the axis with slack. The rotation is kept.
    ///
    /// Returns `false`, leaving the projection as it was, when the ring
    /// projects to a single point.
    pub fn fit_extent(&mut self, extent: Rect<f64>, ring: &LineString<f64>) -> bool {
        let previous = (self.scale, self.translate);
        self.scale = DEFAULT_SCALE;
        self.translate = (0.0, 0.0);

        let Some(b) = self.bounds(ring) else {
            (self.scale, self.translate) = previous;
            return false;
        };

        let w = extent.width();
        let h = extent.height();
        let k = (w / b.width()).min(h / b.height());
        if !k.is_finite() {
            (self.scale, self.translate) = previous;
            return false;
        }

        let x = extent.min().x + (w - k * (b.max().x + b.min().x)) / 2.0;
        let y = extent.min().y + (h - k * (b.max().y + b.min().y)) / 2.0;
        self.scale = DEFAULT_SCALE * k;
        self.translate = (x, y);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::line_string;

    #[test]
    fn test_kind_from_str_is_case_insensitive() {
        assert_eq!("wb".parse::<ProjectionKind>().unwrap(), ProjectionKind::WatermanButterfly);
        assert_eq!("W3".parse::<ProjectionKind>().unwrap(), ProjectionKind::WinkelTripel);
        assert_eq!("w3".parse::<ProjectionKind>().unwrap(), ProjectionKind::WinkelTripel);
    }

    #[test]
    fn test_kind_from_str_rejects_unknown() {
        let err = "mercator".parse::<ProjectionKind>().unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedProjection { ref name } if name == "mercator"));
    }

    #[test]
    fn test_default_scales() {
        assert_eq!(ProjectionKind::WatermanButterfly.default_scale(1200.0), 120.0);
        assert_eq!(ProjectionKind::WinkelTripel.default_scale(1200.0), 200.0);
    }

    #[test]
    fn test_project_applies_scale_and_translate() {
        let projection = Projection::new(ProjectionKind::WinkelTripel)
            .with_scale(100.0)
            .with_translate(600.0, 400.0);
        let (x, y) = projection.project(0.0, 0.0);
        assert!((x - 600.0).abs() < 1e-9);
        assert!((y - 400.0).abs() < 1e-9);

        // North is up on the canvas
        let (_, y_north) = projection.project(0.0, 45.0);
        assert!(y_north < 400.0);
    }

    #[test]
    fn test_rotation_recentres_map() {
        let projection = Projection::new(ProjectionKind::WinkelTripel)
            .with_rotation([-30.0, -10.0, 0.0])
            .with_translate(600.0, 400.0);
        let (x, y) = projection.project(30.0, 10.0);
        assert!((x - 600.0).abs() < 1e-9);
        assert!((y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_of_ring() {
        let projection = Projection::new(ProjectionKind::WinkelTripel);
        let ring = line_string![
            (x: -10.0, y: -10.0),
            (x: -10.0, y: 10.0),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: -10.0),
            (x: -10.0, y: -10.0),
        ];
        let b = projection.bounds(&ring).unwrap();
        assert!(b.min().x < 0.0 && b.max().x > 0.0);
        assert!((b.min().x + b.max().x).abs() < 1e-9);
        assert!((b.min().y + b.max().y).abs() < 1e-9);
    }

    #[test]
    fn test_fit_extent_fills_limiting_axis() {
        let mut projection = Projection::new(ProjectionKind::WinkelTripel);
        let ring = line_string![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 10.0),
            (x: 40.0, y: 10.0),
            (x: 40.0, y: 0.0),
            (x: 0.0, y: 0.0),
        ];
        let extent = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1200.0, y: 800.0 });
        assert!(projection.fit_extent(extent, &ring));

        // A wide, short box is limited by the canvas width
        let b = projection.bounds(&ring).unwrap();
        assert!(b.min().x.abs() < 1e-6);
        assert!((b.max().x - 1200.0).abs() < 1e-6);
        assert!(b.min().y > 0.0 && b.max().y < 800.0);
        assert!(((b.min().y + b.max().y) / 2.0 - 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_extent_degenerate_ring_is_ignored() {
        let mut projection = Projection::new(ProjectionKind::WinkelTripel)
            .with_scale(200.0)
            .with_translate(600.0, 400.0);
        let ring = line_string![(x: 5.0, y: 5.0), (x: 5.0, y: 5.0)];
        let extent = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1200.0, y: 800.0 });
        assert!(!projection.fit_extent(extent, &ring));
        assert_eq!(projection.scale(), 200.0);
        assert_eq!(projection.translate(), (600.0, 400.0));
    }

    #[test]
    fn test_sphere_outline_spans_canvas_center() {
        let projection = Projection::new(ProjectionKind::WatermanButterfly)
            .with_scale(120.0)
            .with_translate(600.0, 400.0);
        let outline = projection.sphere_outline();
        let min_x = outline.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let max_x = outline.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        assert!(min_x < 600.0 && max_x > 600.0);
    }
}
