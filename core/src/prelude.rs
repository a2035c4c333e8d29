use std::fmt;

/// Raised when an index does not address an existing cone or chart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("index {index} out of bounds (len {len})")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

impl IndexError {
    pub fn new(index: usize, len: usize) -> Self {
        Self { index, len }
    }
}

/// Malformed persisted or imported chart data.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed chart data: {message}")]
pub struct DecodeError {
    pub message: String,
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Failure reported by a storage or file collaborator.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("i/o failure on {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: std::io::Error,
    },
    #[error("nothing to import: {0}")]
    NothingSelected(String),
}

impl StorageError {
    pub fn io(target: impl fmt::Display, source: std::io::Error) -> Self {
        StorageError::Io {
            target: target.to_string(),
            source,
        }
    }
}

/// Common error type for chart persistence operations.
#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    #[error("cannot encode chart: {0}")]
    Encode(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

pub type ChartResult<T> = Result<T, ChartError>;

/// Rejected plot parameters.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    #[error("zoom must be a finite value above zero, got {0}")]
    InvalidZoom(f64),
    #[error("world rotation must be finite, got {0}")]
    InvalidRotation(f64),
    #[error("canvas must have a positive size, got {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
    #[error("scale factor must be a finite value above zero, got {0}")]
    InvalidScaleFactor(f64),
}

pub type PlotResult<T> = Result<T, PlotError>;
