use thiserror::Error;

/// Errors surfaced by the map rendering pipeline
#[derive(Debug, Error)]
pub enum MapError {
    /// A path-language string could not be tokenized into segments.
    /// Contained per-country: the offending outline is skipped, not fatal.
    #[error("malformed path data: {0}")]
    MalformedPath(String),

    /// The geometry bundle itself was not valid JSON of the expected shape
    #[error("invalid geometry bundle: {0}")]
    BadBundle(String),

    /// Geometry was requested before the one-time bundle load completed
    #[error("geometry repository accessed before load")]
    NotLoaded,

    /// Zero or negative drawing-surface dimensions
    #[error("invalid surface size {width}x{height}")]
    InvalidSurface { width: f64, height: f64 },
}
