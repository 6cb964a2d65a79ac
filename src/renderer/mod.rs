//! SVG renderer for projected maps
//!
//! This module turns projected geometry into path data and assembles the
//! final document: sphere definition and clip, background, graticule and
//! dataset paths.

pub mod config;
pub mod path;
pub mod svg;

pub use config::SvgConfig;
pub use path::PathGenerator;
pub use svg::SvgBuilder;
