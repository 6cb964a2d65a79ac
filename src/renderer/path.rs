//! Geometry to SVG path conversion
//!
//! Turns geographic geometry into SVG path `d` attribute strings through a
//! [`Projection`]. Lines are resampled and split by the projection; rings
//! that survive in one piece are closed with `Z`. Points are drawn as small
//! circles.

use geo_types::{Coord, Geometry, LineString, Polygon};

use crate::projection::Projection;

/// Radius of the circle drawn for a point geometry
pub const DEFAULT_POINT_RADIUS: f64 = 4.5;

/// Builds path data for geometry under a fixed projection
pub struct PathGenerator<'a> {
    projection: &'a Projection,
    point_radius: f64,
}

impl<'a> PathGenerator<'a> {
    pub fn new(projection: &'a Projection) -> Self {
        Self {
            projection,
            point_radius: DEFAULT_POINT_RADIUS,
        }
    }

    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    /// Path data for the outline of the globe
    pub fn sphere(&self) -> String {
        let mut d = String::new();
        push_polyline(&mut d, &self.projection.sphere_outline());
        if !d.is_empty() {
            d.push('Z');
        }
        d
    }

    /// Path data for any geometry; empty when nothing is visible
    pub fn geometry(&self, geometry: &Geometry<f64>) -> String {
        let mut d = String::new();
        self.push_geometry(&mut d, geometry);
        d
    }

    fn push_geometry(&self, d: &mut String, geometry: &Geometry<f64>) {
        match geometry {
            Geometry::Point(point) => self.push_point(d, point.0),
            Geometry::MultiPoint(points) => {
                for point in points {
                    self.push_point(d, point.0);
                }
            }
            Geometry::Line(line) => {
                self.push_line(d, &LineString::new(vec![line.start, line.end]), false)
            }
            Geometry::LineString(line) => self.push_line(d, line, false),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    self.push_line(d, line, false);
                }
            }
            Geometry::Polygon(polygon) => self.push_polygon(d, polygon),
            Geometry::MultiPolygon(polygons) => {
                for polygon in polygons {
                    self.push_polygon(d, polygon);
                }
            }
            Geometry::Rect(rect) => self.push_polygon(d, &rect.to_polygon()),
            Geometry::Triangle(triangle) => self.push_polygon(d, &triangle.to_polygon()),
            Geometry::GeometryCollection(collection) => {
                for member in collection {
                    self.push_geometry(d, member);
                }
            }
        }
    }

    fn push_polygon(&self, d: &mut String, polygon: &Polygon<f64>) {
        self.push_line(d, polygon.exterior(), true);
        for interior in polygon.interiors() {
            self.push_line(d, interior, true);
        }
    }

    fn push_line(&self, d: &mut String, line: &LineString<f64>, ring: bool) {
        let pieces = self.projection.project_line(line);
        let closed = ring && pieces.len() == 1 && line.is_closed();
        for piece in &pieces {
            push_polyline(d, piece);
        }
        if closed {
            d.push('Z');
        }
    }

    fn push_point(&self, d: &mut String, c: Coord<f64>) {
        let (x, y) = self.projection.project(c.x, c.y);
        let r = self.point_radius;
        d.push_str(&format!(
            "M{:.3},{:.3}a{r},{r} 0 1,1 0,{}a{r},{r} 0 1,1 0,{}Z",
            x,
            y + r,
            -2.0 * r,
            2.0 * r,
        ));
    }
}

/// Append `M x,y L x,y …` for a projected polyline
fn push_polyline(d: &mut String, points: &[(f64, f64)]) {
    let mut points = points.iter();
    if let Some((x, y)) = points.next() {
        d.push_str(&format!("M{:.3},{:.3}", x, y));
        for (x, y) in points {
            d.push_str(&format!("L{:.3},{:.3}", x, y));
        }
    }
}
