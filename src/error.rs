//! Error types for the ray caster.

use thiserror::Error;

/// Errors that can occur while loading, transforming or rendering a scene.
#[derive(Error, Debug)]
pub enum RtError {
    /// A vector was too short to be normalized.
    #[error("cannot normalize a near-zero vector")]
    DegenerateVector,

    /// A primitive has a non-positive size or a zero direction.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The camera's field of view is outside (0, 180) degrees.
    #[error("field of view must lie strictly between 0 and 180 degrees, got {0}")]
    InvalidFieldOfView(f64),

    /// A line of an `.rt` scene description could not be parsed.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The scene description is structurally incomplete.
    #[error("invalid scene: {0}")]
    InvalidScene(String),

    /// The scene file has an extension we cannot read.
    #[error("unsupported scene format: {0}")]
    UnsupportedFormat(String),

    /// A session command could not be parsed.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for ray caster operations.
pub type Result<T> = std::result::Result<T, RtError>;
