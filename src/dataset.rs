//! Dataset loading
//!
//! A dataset is a named piece of line geometry (coastlines, rivers,
//! borders). Loaders map an identifier to GeoJSON-compatible geometry;
//! their errors reach the caller unchanged.

use std::collections::HashMap;
use std::path::PathBuf;

use geo_types::{Geometry, GeometryCollection};
use geojson::GeoJson;
use log::debug;
use thiserror::Error;

/// Errors raised while resolving a dataset
#[derive(Debug, Error)]
pub enum LoadError {
    /// No dataset with this identifier exists
    #[error("unknown dataset '{0}'")]
    UnknownDataset(String),

    /// The dataset file exists but could not be read
    #[error("failed to read dataset '{name}' from {}: {source}", path.display())]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset file is not JSON
    #[error("dataset '{name}' is not valid JSON: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON is not GeoJSON we can draw
    #[error("dataset '{name}' is not valid GeoJSON: {reason}")]
    InvalidGeoJson { name: String, reason: String },
}

/// Resolves dataset identifiers to geometry
pub trait DatasetLoader {
    fn load(&self, name: &str) -> Result<Geometry<f64>, LoadError>;
}

/// Loads `<name>.geojson` (or `<name>.json`) from a directory
#[derive(Debug, Clone)]
pub struct GeoJsonDirLoader {
    root: PathBuf,
}

impl GeoJsonDirLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        ["geojson", "json"]
            .iter()
            .map(|ext| self.root.join(format!("{}.{}", name, ext)))
            .find(|path| path.is_file())
    }
}

impl DatasetLoader for GeoJsonDirLoader {
    fn load(&self, name: &str) -> Result<Geometry<f64>, LoadError> {
        let path = self
            .locate(name)
            .ok_or_else(|| LoadError::UnknownDataset(name.to_string()))?;
        debug!("loading dataset '{}' from {}", name, path.display());

        let bytes = std::fs::read(&path).map_err(|source| LoadError::Io {
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;
        read_geojson_bytes(name, &bytes)
    }
}

/// Serves geometry held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    datasets: HashMap<String, Geometry<f64>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset under `name`, replacing any previous one
    pub fn insert(&mut self, name: impl Into<String>, geometry: impl Into<Geometry<f64>>) {
        self.datasets.insert(name.into(), geometry.into());
    }

    /// Register a dataset under `name`
    pub fn with_dataset(mut self, name: impl Into<String>, geometry: impl Into<Geometry<f64>>) -> Self {
        self.insert(name, geometry);
        self
    }
}

impl DatasetLoader for MemoryLoader {
    fn load(&self, name: &str) -> Result<Geometry<f64>, LoadError> {
        self.datasets
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::UnknownDataset(name.to_string()))
    }
}

/// Parse GeoJSON bytes (FeatureCollection, Feature or bare geometry) into
/// one geometry. Collections become a `GeometryCollection`; features
/// without geometry are skipped.
pub fn read_geojson_bytes(name: &str, bytes: &[u8]) -> Result<Geometry<f64>, LoadError> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|source| LoadError::Json {
        name: name.to_string(),
        source,
    })?;
    let invalid = |e: geojson::Error| LoadError::InvalidGeoJson {
        name: name.to_string(),
        reason: e.to_string(),
    };

    let geometry = match GeoJson::from_json_value(value).map_err(invalid)? {
        GeoJson::FeatureCollection(collection) => {
            let geometries = collection
                .features
                .into_iter()
                .filter_map(|feature| feature.geometry)
                .map(Geometry::<f64>::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map_err(invalid)?;
            Geometry::GeometryCollection(GeometryCollection::new_from(geometries))
        }
        GeoJson::Feature(feature) => match feature.geometry {
            Some(geometry) => Geometry::<f64>::try_from(geometry).map_err(invalid)?,
            None => Geometry::GeometryCollection(GeometryCollection::new_from(vec![])),
        },
        GeoJson::Geometry(geometry) => Geometry::<f64>::try_from(geometry).map_err(invalid)?,
    };
    Ok(geometry)
}
