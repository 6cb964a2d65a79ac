//! Render options and map styling
//!
//! [`RenderOptions`] carries everything a render needs: projection
//! identifier, dataset list, output path, optional center and bounds, and a
//! partial set of style overrides. Options can be built in code or loaded
//! from a TOML file:
//!
//! ```toml
//! projection = "W3"
//! mapdata = "50mcoastline, rivers"
//! output = "world.svg"
//! center = "0,10"
//!
//! [styles]
//! linecolor = "#1a1a1a"
//! showgraticules = false
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::error::RenderError;

/// Errors that can occur when loading options from a file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration for a single map render
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Projection identifier (`WB` or `W3`, any case)
    pub projection: String,
    /// Comma-separated dataset identifiers, drawn in order
    pub mapdata: String,
    /// Where the SVG is written
    pub output: PathBuf,
    /// Optional `"lat,lon"` map center
    pub center: Option<String>,
    /// Optional `"minLat,maxLat,minLon,maxLon"` region to zoom onto
    pub bounds: Option<String>,
    /// Style overrides merged over [`MapStyle::default`]
    pub styles: StyleOverrides,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            projection: "WB".to_string(),
            mapdata: "50mcoastline".to_string(),
            output: PathBuf::from("map.svg"),
            center: None,
            bounds: None,
            styles: StyleOverrides::default(),
        }
    }
}

impl RenderOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load options from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the projection identifier
    pub fn with_projection(mut self, projection: impl Into<String>) -> Self {
        self.projection = projection.into();
        self
    }

    /// Set the comma-separated dataset list
    pub fn with_mapdata(mut self, mapdata: impl Into<String>) -> Self {
        self.mapdata = mapdata.into();
        self
    }

    /// Set the output path
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Set the `"lat,lon"` center
    pub fn with_center(mut self, center: impl Into<String>) -> Self {
        self.center = Some(center.into());
        self
    }

    /// Set the `"minLat,maxLat,minLon,maxLon"` bounds
    pub fn with_bounds(mut self, bounds: impl Into<String>) -> Self {
        self.bounds = Some(bounds.into());
        self
    }

    /// Set the style overrides
    pub fn with_styles(mut self, styles: StyleOverrides) -> Self {
        self.styles = styles;
        self
    }

    /// Dataset identifiers in drawing order, trimmed, empty entries dropped
    pub fn dataset_names(&self) -> Vec<&str> {
        self.mapdata
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Style overrides merged over the defaults
    pub fn style(&self) -> MapStyle {
        MapStyle::default().merge(&self.styles)
    }
}

/// Graticule switch: a boolean, or a string that is off only when it reads
/// `"false"` in any case
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Toggle {
    Bool(bool),
    Text(String),
}

impl Toggle {
    pub fn enabled(&self) -> bool {
        match self {
            Toggle::Bool(on) => *on,
            Toggle::Text(text) => !text.trim().eq_ignore_ascii_case("false"),
        }
    }
}

impl From<bool> for Toggle {
    fn from(on: bool) -> Self {
        Toggle::Bool(on)
    }
}

impl From<&str> for Toggle {
    fn from(text: &str) -> Self {
        Toggle::Text(text.to_string())
    }
}

/// Partial style settings; set fields win over the defaults
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    #[serde(alias = "linethickness")]
    pub line_thickness: Option<f64>,
    #[serde(alias = "linecolor")]
    pub line_color: Option<String>,
    #[serde(alias = "outlinethickness")]
    pub outline_thickness: Option<f64>,
    #[serde(alias = "outlinecolor")]
    pub outline_color: Option<String>,
    #[serde(alias = "showgraticules")]
    pub show_graticules: Option<Toggle>,
    #[serde(alias = "backgroundcolor")]
    pub background_color: Option<String>,
}

impl StyleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_thickness(mut self, thickness: f64) -> Self {
        self.line_thickness = Some(thickness);
        self
    }

    pub fn with_line_color(mut self, color: impl Into<String>) -> Self {
        self.line_color = Some(color.into());
        self
    }

    pub fn with_outline_thickness(mut self, thickness: f64) -> Self {
        self.outline_thickness = Some(thickness);
        self
    }

    pub fn with_outline_color(mut self, color: impl Into<String>) -> Self {
        self.outline_color = Some(color.into());
        self
    }

    pub fn with_show_graticules(mut self, show: impl Into<Toggle>) -> Self {
        self.show_graticules = Some(show.into());
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Fields set in `other` replace the ones set here
    pub fn overlay(mut self, other: StyleOverrides) -> Self {
        self.line_thickness = other.line_thickness.or(self.line_thickness);
        self.line_color = other.line_color.or(self.line_color);
        self.outline_thickness = other.outline_thickness.or(self.outline_thickness);
        self.outline_color = other.outline_color.or(self.outline_color);
        self.show_graticules = other.show_graticules.or(self.show_graticules);
        self.background_color = other.background_color.or(self.background_color);
        self
    }
}

/// Fully resolved map style
#[derive(Debug, Clone, PartialEq)]
pub struct MapStyle {
    /// Stroke width of dataset paths
    pub line_thickness: f64,
    /// Stroke color of dataset paths
    pub line_color: String,
    /// Stroke width of the globe outline
    pub outline_thickness: f64,
    /// Stroke color of the globe outline
    pub outline_color: String,
    pub show_graticules: bool,
    /// Fill of the globe background
    pub background_color: String,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            line_thickness: 1.0,
            line_color: "black".to_string(),
            outline_thickness: 0.5,
            outline_color: "black".to_string(),
            show_graticules: true,
            background_color: "white".to_string(),
        }
    }
}

impl MapStyle {
    /// Apply overrides on top of this style
    pub fn merge(mut self, overrides: &StyleOverrides) -> Self {
        if let Some(thickness) = overrides.line_thickness {
            self.line_thickness = thickness;
        }
        if let Some(color) = &overrides.line_color {
            self.line_color = color.clone();
        }
        if let Some(thickness) = overrides.outline_thickness {
            self.outline_thickness = thickness;
        }
        if let Some(color) = &overrides.outline_color {
            self.outline_color = color.clone();
        }
        if let Some(toggle) = &overrides.show_graticules {
            self.show_graticules = toggle.enabled();
        }
        if let Some(color) = &overrides.background_color {
            self.background_color = color.clone();
        }
        self
    }
}

/// Map center in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

impl Center {
    /// Parse `"lat,lon"`. Returns `None` unless both parts are numbers.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(',');
        let lat = parse_number(parts.next()?)?;
        let lon = parse_number(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { lat, lon })
    }
}

/// Geographic rectangle in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl FromStr for Bounds {
    type Err = RenderError;

    /// Parse `"minLat,maxLat,minLon,maxLon"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(RenderError::invalid_bounds(
                s,
                format!("expected 4 comma-separated numbers, found {}", parts.len()),
            ));
        }

        let mut values = [0.0; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = parse_number(part).ok_or_else(|| {
                RenderError::invalid_bounds(s, format!("'{}' is not a number", part.trim()))
            })?;
        }

        Ok(Self {
            min_lat: values[0],
            max_lat: values[1],
            min_lon: values[2],
            max_lon: values[3],
        })
    }
}

/// A finite number, ignoring surrounding whitespace
fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!(options.projection, "WB");
        assert_eq!(options.mapdata, "50mcoastline");
        assert_eq!(options.output, PathBuf::from("map.svg"));
        assert_eq!(options.center, None);
        assert_eq!(options.bounds, None);
        assert_eq!(options.styles, StyleOverrides::default());
    }

    #[test]
    fn test_builder_pattern() {
        let options = RenderOptions::new()
            .with_projection("W3")
            .with_mapdata("a,b")
            .with_output("out.svg")
            .with_center("10,20")
            .with_bounds("0,1,2,3");
        assert_eq!(options.projection, "W3");
        assert_eq!(options.mapdata, "a,b");
        assert_eq!(options.output, PathBuf::from("out.svg"));
        assert_eq!(options.center.as_deref(), Some("10,20"));
        assert_eq!(options.bounds.as_deref(), Some("0,1,2,3"));
    }

    #[test]
    fn test_dataset_names_trimmed_in_order() {
        let options = RenderOptions::new().with_mapdata(" coast , rivers,lakes ,, ");
        assert_eq!(options.dataset_names(), vec!["coast", "rivers", "lakes"]);
    }

    #[test]
    fn test_default_style() {
        let style = MapStyle::default();
        assert_eq!(style.line_thickness, 1.0);
        assert_eq!(style.line_color, "black");
        assert_eq!(style.outline_thickness, 0.5);
        assert_eq!(style.outline_color, "black");
        assert!(style.show_graticules);
        assert_eq!(style.background_color, "white");
    }

    #[test]
    fn test_overrides_win() {
        let overrides = StyleOverrides::new()
            .with_line_thickness(2.5)
            .with_line_color("red")
            .with_background_color("#eef");
        let style = MapStyle::default().merge(&overrides);
        assert_eq!(style.line_thickness, 2.5);
        assert_eq!(style.line_color, "red");
        assert_eq!(style.background_color, "#eef");
        // Untouched keys keep their defaults
        assert_eq!(style.outline_thickness, 0.5);
        assert_eq!(style.outline_color, "black");
        assert!(style.show_graticules);
    }

    #[test]
    fn test_show_graticules_toggle() {
        assert!(!Toggle::from("false").enabled());
        assert!(!Toggle::from("FALSE").enabled());
        assert!(!Toggle::from("False").enabled());
        assert!(Toggle::from("true").enabled());
        assert!(Toggle::from("yes").enabled());
        assert!(!Toggle::from(false).enabled());
        assert!(Toggle::from(true).enabled());
    }

    #[test]
    fn test_overlay_prefers_other() {
        let base = StyleOverrides::new().with_line_color("red").with_line_thickness(3.0);
        let top = StyleOverrides::new().with_line_color("blue");
        let merged = base.overlay(top);
        assert_eq!(merged.line_color.as_deref(), Some("blue"));
        assert_eq!(merged.line_thickness, Some(3.0));
    }

    #[test]
    fn test_from_toml() {
        let options = RenderOptions::from_str(
            r##"
            projection = "w3"
            mapdata = "coast,rivers"
            center = "10,20"

            [styles]
            linethickness = 2.0
            linecolor = "#333"
            showgraticules = "FALSE"
            "##,
        )
        .unwrap();
        assert_eq!(options.projection, "w3");
        assert_eq!(options.output, PathBuf::from("map.svg"));
        assert_eq!(options.center.as_deref(), Some("10,20"));

        let style = options.style();
        assert_eq!(style.line_thickness, 2.0);
        assert_eq!(style.line_color, "#333");
        assert!(!style.show_graticules);
    }

    #[test]
    fn test_from_toml_snake_case_and_bool() {
        let options = RenderOptions::from_str(
            r#"
            [styles]
            show_graticules = false
            outline_color = "navy"
            "#,
        )
        .unwrap();
        let style = options.style();
        assert!(!style.show_graticules);
        assert_eq!(style.outline_color, "navy");
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(matches!(
            RenderOptions::from_str("projection = ["),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_center_parse() {
        assert_eq!(Center::parse("200,50"), Some(Center { lat: 200.0, lon: 50.0 }));
        assert_eq!(Center::parse(" -10.5 , 30 "), Some(Center { lat: -10.5, lon: 30.0 }));
        assert_eq!(Center::parse("abc,50"), None);
        assert_eq!(Center::parse("10,"), None);
        assert_eq!(Center::parse("10"), None);
        assert_eq!(Center::parse("1,2,3"), None);
    }

    #[test]
    fn test_bounds_parse() {
        let bounds: Bounds = "10,20,30,40".parse().unwrap();
        assert_eq!(
            bounds,
            Bounds {
                min_lat: 10.0,
                max_lat: 20.0,
                min_lon: 30.0,
                max_lon: 40.0,
            }
        );
    }

    #[test]
    fn test_bounds_non_numeric() {
        let err = "10,x,30,40".parse::<Bounds>().unwrap_err();
        assert!(matches!(err, RenderError::InvalidBounds { .. }));
        assert!(err.to_string().contains("'x' is not a number"));
    }

    #[test]
    fn test_bounds_wrong_arity_and_nan() {
        assert!("10,20,30".parse::<Bounds>().is_err());
        assert!("10,20,30,40,50".parse::<Bounds>().is_err());
        assert!("10,NaN,30,40".parse::<Bounds>().is_err());
        assert!("10,inf,30,40".parse::<Bounds>().is_err());
    }
}
