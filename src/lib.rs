//! Atlas Render - SVG world maps from line datasets
//!
//! This library projects geographic line data (coastlines, rivers, borders)
//! with a Waterman butterfly or Winkel Tripel projection and writes the
//! result as a styled SVG document with a clipped globe background and an
//! optional graticule.
//!
//! # Example
//!
//! ```rust
//! use atlas_render::{render_document, MemoryLoader, RenderOptions};
//! use geo_types::line_string;
//!
//! let loader = MemoryLoader::new()
//!     .with_dataset("coast", line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 10.0)]);
//! let options = RenderOptions::new().with_projection("W3").with_mapdata("coast");
//!
//! let svg = render_document(&options, &loader).unwrap();
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains(r#"data-name="coast""#));
//! ```

pub mod dataset;
pub mod error;
pub mod graticule;
pub mod options;
pub mod projection;
pub mod renderer;

pub use dataset::{read_geojson_bytes, DatasetLoader, GeoJsonDirLoader, LoadError, MemoryLoader};
pub use error::RenderError;
pub use graticule::Graticule;
pub use options::{Bounds, Center, ConfigError, MapStyle, RenderOptions, StyleOverrides, Toggle};
pub use projection::{fit_bounds, setup_projection, Projection, ProjectionKind};
pub use renderer::{PathGenerator, SvgBuilder, SvgConfig};

use geo_types::Geometry;
use log::{debug, info};

/// Spacing of graticule lines in degrees
pub const GRATICULE_STEP: f64 = 15.0;

/// Render a map and write it to `options.output`
///
/// Returns the SVG text that was written. The file is written once, after
/// the whole document has been built.
pub fn render_map<L>(options: &RenderOptions, loader: &L) -> Result<String, RenderError>
where
    L: DatasetLoader + ?Sized,
{
    render_map_with_config(options, loader, &SvgConfig::default())
}

/// Render a map with a custom SVG configuration and write it to
/// `options.output`
pub fn render_map_with_config<L>(
    options: &RenderOptions,
    loader: &L,
    config: &SvgConfig,
) -> Result<String, RenderError>
where
    L: DatasetLoader + ?Sized,
{
    let svg = render_document_with_config(options, loader, config)?;

    std::fs::write(&options.output, &svg).map_err(|source| RenderError::Write {
        path: options.output.clone(),
        source,
    })?;
    info!("wrote {} ({} bytes)", options.output.display(), svg.len());

    Ok(svg)
}

/// Render a map to SVG text without writing it anywhere
pub fn render_document<L>(options: &RenderOptions, loader: &L) -> Result<String, RenderError>
where
    L: DatasetLoader + ?Sized,
{
    render_document_with_config(options, loader, &SvgConfig::default())
}

/// Render a map to SVG text with a custom SVG configuration
///
/// # Example
///
/// ```rust
/// use atlas_render::{render_document_with_config, MemoryLoader, RenderOptions, SvgConfig};
///
/// let options = RenderOptions::new().with_mapdata("");
/// let config = SvgConfig::new().with_size(600.0, 400.0).with_standalone(false);
///
/// let svg = render_document_with_config(&options, &MemoryLoader::new(), &config).unwrap();
/// assert!(svg.starts_with("<svg"));
/// assert!(svg.contains(r#"viewBox="0 0 600 400""#));
/// ```
pub fn render_document_with_config<L>(
    options: &RenderOptions,
    loader: &L,
    config: &SvgConfig,
) -> Result<String, RenderError>
where
    L: DatasetLoader + ?Sized,
{
    let names = options.dataset_names();
    let style = options.style();

    // Projection: identifier and center first, then bounds override scale/translate
    let mut projection = setup_projection(
        &options.projection,
        options.center.as_deref(),
        config.width,
        config.height,
    )?;
    if let Some(raw) = &options.bounds {
        let bounds: Bounds = raw.parse()?;
        fit_bounds(&mut projection, &bounds, config.width, config.height);
    }

    let path = PathGenerator::new(&projection);
    let mut builder = SvgBuilder::new(config.clone());

    builder.add_sphere(&path.sphere());
    builder.add_background(&style);

    if style.show_graticules {
        let graticule = Graticule::new().with_step(GRATICULE_STEP, GRATICULE_STEP);
        let grid = Geometry::MultiLineString(graticule.to_multi_line_string());
        builder.add_graticule(&path.geometry(&grid));
    }

    // Datasets are loaded one at a time and drawn in list order
    for name in names {
        let geometry = loader.load(name)?;
        let d = path.geometry(&geometry);
        debug!("drew dataset '{}' ({} bytes of path data)", name, d.len());
        builder.add_dataset(name, &d, &style);
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, polygon};

    fn loader() -> MemoryLoader {
        MemoryLoader::new()
            .with_dataset(
                "coast",
                line_string![(x: -10.0, y: 40.0), (x: 0.0, y: 50.0), (x: 10.0, y: 55.0)],
            )
            .with_dataset(
                "island",
                polygon![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0), (x: 5.0, y: 5.0), (x: 0.0, y: 0.0)],
            )
    }

    #[test]
    fn test_render_default_projection() {
        let options = RenderOptions::new().with_mapdata("coast");
        let svg = render_document(&options, &loader()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains(r#"id="sphere""#));
        assert!(svg.contains(r#"data-name="coast""#));
    }

    #[test]
    fn test_render_datasets_in_order() {
        let options = RenderOptions::new()
            .with_projection("w3")
            .with_mapdata("island, coast");
        let svg = render_document(&options, &loader()).unwrap();
        let island = svg.find(r#"data-name="island""#).unwrap();
        let coast = svg.find(r#"data-name="coast""#).unwrap();
        assert!(island < coast);
    }

    #[test]
    fn test_render_unknown_projection() {
        let options = RenderOptions::new().with_projection("mercator");
        let err = render_document(&options, &loader()).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedProjection { ref name } if name == "mercator"));
    }

    #[test]
    fn test_render_unknown_dataset() {
        let options = RenderOptions::new().with_mapdata("coast,atlantis");
        let err = render_document(&options, &loader()).unwrap_err();
        assert!(matches!(err, RenderError::Load(LoadError::UnknownDataset(ref n)) if n == "atlantis"));
    }

    #[test]
    fn test_render_bad_bounds() {
        let options = RenderOptions::new().with_bounds("10,x,30,40");
        let err = render_document(&options, &loader()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidBounds { .. }));
    }

    #[test]
    fn test_render_without_graticule() {
        let options = RenderOptions::new()
            .with_mapdata("coast")
            .with_styles(StyleOverrides::new().with_show_graticules("False"));
        let svg = render_document(&options, &loader()).unwrap();
        assert!(!svg.contains(r#"class="graticule""#));
    }

    #[test]
    fn test_render_with_dyn_loader() {
        let loader: Box<dyn DatasetLoader> = Box::new(loader());
        let options = RenderOptions::new().with_mapdata("coast");
        let svg = render_document(&options, loader.as_ref()).unwrap();
        assert!(svg.contains(r#"data-name="coast""#));
    }
}
