//! Error types for the render pipeline

use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::LoadError;

/// Errors that abort a map render
#[derive(Debug, Error)]
pub enum RenderError {
    /// Projection identifier is neither `WB` nor `W3`
    #[error("unsupported projection '{name}'")]
    UnsupportedProjection { name: String },

    /// A bounds component is missing or not a number
    #[error("invalid bounds '{bounds}': {reason}")]
    InvalidBounds { bounds: String, reason: String },

    /// Dataset could not be loaded
    #[error("failed to load dataset: {0}")]
    Load(#[from] LoadError),

    /// Output file could not be written
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub fn unsupported_projection(name: impl Into<String>) -> Self {
        Self::UnsupportedProjection { name: name.into() }
    }

    pub fn invalid_bounds(bounds: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBounds {
            bounds: bounds.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_projection_names_identifier() {
        let err = RenderError::unsupported_projection("XYZ");
        assert_eq!(err.to_string(), "unsupported projection 'XYZ'");
    }

    #[test]
    fn test_load_error_converts() {
        let err: RenderError = LoadError::UnknownDataset("moon".to_string()).into();
        assert!(matches!(err, RenderError::Load(_)));
        assert!(err.to_string().contains("moon"));
    }

    #[test]
    fn test_write_error_mentions_path() {
        let err = RenderError::Write {
            path: PathBuf::from("/nope/map.svg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/nope/map.svg"));
    }
}
