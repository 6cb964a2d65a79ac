//! Projection selection and bounds fitting for a render

use geo_types::{coord, polygon, Polygon, Rect};
use log::debug;

use crate::error::RenderError;
use crate::options::{Bounds, Center};

use super::{Projection, ProjectionKind};

/// Select a projection by identifier and fit it to a canvas.
///
/// `"WB"` (Waterman butterfly) and `"W3"` (Winkel Tripel) are accepted in
/// any case; the projection is centred on the canvas at its default scale.
/// A `"lat,lon"` center rotates the globe by `[lon, lat, 0]`. A center that
/// does not parse is ignored and the rotation stays at its default.
pub fn setup_projection(
    name: &str,
    center: Option<&str>,
    width: f64,
    height: f64,
) -> Result<Projection, RenderError> {
    let kind: ProjectionKind = name.parse()?;
    let mut projection = Projection::new(kind)
        .with_scale(kind.default_scale(width))
        .with_translate(width / 2.0, height / 2.0);

    if let Some(raw) = center {
        match Center::parse(raw) {
            Some(center) => {
                debug!("rotating {} projection to center {:?}", kind, center);
                projection.set_rotation([center.lon, center.lat, 0.0]);
            }
            None => debug!("ignoring malformed center '{}'", raw),
        }
    }

    Ok(projection)
}

/// Zoom the projection so that `bounds` fills the canvas.
///
/// Overrides any scale and translation set earlier; the rotation is kept.
pub fn fit_bounds(projection: &mut Projection, bounds: &Bounds, width: f64, height: f64) {
    let extent = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: width, y: height });
    let feature = bounding_box_polygon(bounds);
    if projection.fit_extent(extent, feature.exterior()) {
        debug!(
            "fitted {} to {:?}: scale {:.3}, translate {:?}",
            projection.kind(),
            bounds,
            projection.scale(),
            projection.translate()
        );
    } else {
        debug!("bounds {:?} project to a single point, keeping scale", bounds);
    }
}

/// The closed four-corner ring around `bounds`, in (lon, lat) order:
/// south-west, north-west, north-east, south-east, back to south-west.
pub fn bounding_box_polygon(bounds: &Bounds) -> Polygon<f64> {
    polygon![
        (x: bounds.min_lon, y: bounds.min_lat),
        (x: bounds.min_lon, y: bounds.max_lat),
        (x: bounds.max_lon, y: bounds.max_lat),
        (x: bounds.max_lon, y: bounds.min_lat),
        (x: bounds.min_lon, y: bounds.min_lat),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_setup_winkel() {
        let projection = setup_projection("W3", None, 1200.0, 800.0).unwrap();
        assert_eq!(projection.kind(), ProjectionKind::WinkelTripel);
        assert_eq!(projection.scale(), 200.0);
        assert_eq!(projection.translate(), (600.0, 400.0));
        assert_eq!(projection.rotation(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_setup_waterman_lowercase() {
        let projection = setup_projection("wb", None, 1200.0, 800.0).unwrap();
        assert_eq!(projection.kind(), ProjectionKind::WatermanButterfly);
        assert_eq!(projection.scale(), 120.0);
    }

    #[test]
    fn test_setup_unknown_projection() {
        let err = setup_projection("robinson", None, 1200.0, 800.0).unwrap_err();
        assert_eq!(err.to_string(), "unsupported projection 'robinson'");
    }

    #[test]
    fn test_center_rotates_lon_lat() {
        let projection = setup_projection("W3", Some("200,50"), 1200.0, 800.0).unwrap();
        assert_eq!(projection.rotation(), [50.0, 200.0, 0.0]);
    }

    #[test]
    fn test_malformed_center_is_ignored() {
        let projection = setup_projection("W3", Some("abc,50"), 1200.0, 800.0).unwrap();
        assert_eq!(projection.rotation(), [0.0, 0.0, 0.0]);

        let projection = setup_projection("W3", Some("10"), 1200.0, 800.0).unwrap();
        assert_eq!(projection.rotation(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_bounding_box_ring_order() {
        let bounds = Bounds {
            min_lat: 10.0,
            max_lat: 20.0,
            min_lon: 30.0,
            max_lon: 40.0,
        };
        let ring: Vec<(f64, f64)> = bounding_box_polygon(&bounds)
            .exterior()
            .coords()
            .map(|c| (c.x, c.y))
            .collect();
        assert_eq!(
            ring,
            vec![(30.0, 10.0), (30.0, 20.0), (40.0, 20.0), (40.0, 10.0), (30.0, 10.0)]
        );
    }

    #[test]
    fn test_fit_bounds_overrides_scale() {
        let mut projection = setup_projection("W3", None, 1200.0, 800.0).unwrap();
        let bounds: Bounds = "10,20,30,40".parse().unwrap();
        fit_bounds(&mut projection, &bounds, 1200.0, 800.0);
        assert!(projection.scale() > 200.0);
    }
}
