//! Error types for the library side of the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from parsing a `minX,minY,maxX,maxY` bbox string.
#[derive(Debug, Error)]
pub enum ExtentParseError {
    #[error("Expected 4 comma-separated values, got {0}")]
    WrongArity(usize),

    #[error("Invalid number in bbox: '{0}'")]
    InvalidNumber(String),

    #[error("Bbox minimum exceeds maximum: '{0}'")]
    Inverted(String),
}

/// Errors raised by feature readers.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Layer not found: '{0}'")]
    LayerNotFound(String),

    #[error("Failed to read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Invalid GeoJSON in {path:?}: {source}")]
    InvalidGeoJson {
        path: PathBuf,
        source: geojson::Error,
    },

    #[error(transparent)]
    Extent(#[from] ExtentParseError),
}
