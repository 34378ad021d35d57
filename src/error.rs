use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Decoder errors (no path attached yet)
// ---------------------------------------------------------------------------

/// Failure while decoding an SPE buffer.  The loader attaches the file path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("corrupt file: {0}")]
    CorruptFile(String),
}

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the import / analysis / export pipeline.
///
/// Row-level parse failures and unparsable operator entries never show up
/// here: they are dropped or replaced by defaults and only logged.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{}: unsupported format: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("{}: corrupt file: {reason}", path.display())]
    CorruptFile { path: PathBuf, reason: String },

    #[error("{}: no numeric rows left after parsing", .0.display())]
    EmptyFile(PathBuf),

    #[error("no data imported")]
    NoData,

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: CSV error: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: image error: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl PipelineError {
    /// Attach the offending path to a decoder error.
    pub fn from_spe(path: impl Into<PathBuf>, err: SpeError) -> Self {
        let path = path.into();
        match err {
            SpeError::UnsupportedFormat(reason) => PipelineError::UnsupportedFormat { path, reason },
            SpeError::CorruptFile(reason) => PipelineError::CorruptFile { path, reason },
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
