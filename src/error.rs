use thiserror::Error;

/// Errors produced while decoding a serialized freehand path string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathParseError {
    #[error("path string must start with 'M'")]
    MissingMoveTo,

    #[error("path string has no start point")]
    MissingStartPoint,

    #[error("invalid number {0:?} in path string")]
    InvalidNumber(String),

    #[error("expected a point \"x,y\" at byte {0}")]
    ExpectedPoint(usize),

    #[error("unexpected {found:?} at byte {offset}, expected 'Q'")]
    UnexpectedToken { offset: usize, found: char },
}

/// Errors from allocating or converting rasters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RasterError {
    #[error("invalid raster dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Errors returned by the drawing engine's public API
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to allocate render cache: {0}")]
    Raster(#[from] RasterError),

    #[error("Drawable size has not been set")]
    NoDrawableArea,
}

/// Errors that can occur while loading an engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Errors that can occur during project persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize project: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write project: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read project file: {0}")]
    ReadError(String),

    #[error("Corrupt path in shape {index}: {source}")]
    CorruptPath {
        index: usize,
        #[source]
        source: PathParseError,
    },
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;
