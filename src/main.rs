//! Atlas Render CLI
//!
//! Usage:
//!   atlas-render [OPTIONS]
//!
//! Options:
//!   -p, --projection <ID>    Projection identifier: WB or W3
//!   -m, --mapdata <LIST>     Comma-separated dataset identifiers
//!   -o, --output <FILE>      Output SVG path
//!   -c, --config <FILE>      Render options file (TOML format)
//!   -h, --help               Print help

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::LevelFilter;

use atlas_render::{render_map, GeoJsonDirLoader, RenderOptions, StyleOverrides};

#[derive(Parser)]
#[command(name = "atlas-render")]
#[command(about = "Render SVG world maps from GeoJSON line datasets")]
struct Cli {
    /// Projection identifier: WB (Waterman butterfly) or W3 (Winkel Tripel)
    #[arg(short, long)]
    projection: Option<String>,

    /// Comma-separated dataset identifiers, drawn in order
    #[arg(short, long)]
    mapdata: Option<String>,

    /// Output SVG path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Map center as "lat,lon"
    #[arg(long, allow_hyphen_values = true)]
    center: Option<String>,

    /// Region to fit as "minLat,maxLat,minLon,maxLon"
    #[arg(long, allow_hyphen_values = true)]
    bounds: Option<String>,

    /// Stroke width of dataset lines
    #[arg(long)]
    line_thickness: Option<f64>,

    /// Stroke color of dataset lines
    #[arg(long)]
    line_color: Option<String>,

    /// Stroke width of the globe outline
    #[arg(long)]
    outline_thickness: Option<f64>,

    /// Stroke color of the globe outline
    #[arg(long)]
    outline_color: Option<String>,

    /// Draw the graticule ("false" hides it)
    #[arg(long)]
    show_graticules: Option<String>,

    /// Fill of the globe background
    #[arg(long)]
    background_color: Option<String>,

    /// Render options file (TOML format); flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding <name>.geojson datasets
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Also print the SVG to stdout
    #[arg(long)]
    stdout: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn style_overrides(&self) -> StyleOverrides {
        StyleOverrides {
            line_thickness: self.line_thickness,
            line_color: self.line_color.clone(),
            outline_thickness: self.outline_thickness,
            outline_color: self.outline_color.clone(),
            show_graticules: self.show_graticules.as_deref().map(Into::into),
            background_color: self.background_color.clone(),
        }
    }

    /// Options from the config file (or defaults) with flags applied on top
    fn render_options(&self, base: RenderOptions) -> RenderOptions {
        let mut options = base;
        if let Some(projection) = &self.projection {
            options.projection = projection.clone();
        }
        if let Some(mapdata) = &self.mapdata {
            options.mapdata = mapdata.clone();
        }
        if let Some(output) = &self.output {
            options.output = output.clone();
        }
        if let Some(center) = &self.center {
            options.center = Some(center.clone());
        }
        if let Some(bounds) = &self.bounds {
            options.bounds = Some(bounds.clone());
        }
        options.styles = options.styles.overlay(self.style_overrides());
        options
    }
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    // Load options file
    let base = match &cli.config {
        Some(path) => match RenderOptions::from_file(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => RenderOptions::default(),
    };
    let options = cli.render_options(base);

    let loader = GeoJsonDirLoader::new(&cli.data_dir);
    match render_map(&options, &loader) {
        Ok(svg) => {
            if cli.stdout {
                println!("{}", svg);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
