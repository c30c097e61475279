use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed corpus: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("index build failed: {0}")]
    Index(#[from] IndexError),
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("corpus produced no chunks; nothing to index")]
    EmptyCorpus,

    #[error("embedding dimension {actual} does not match index dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("legal database not loaded; load a corpus before querying")]
    NotLoaded,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("error querying database: {0}")]
    Processing(#[from] IndexError),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider response contained no text")]
    EmptyResponse,

    #[error("generation api key is not configured")]
    MissingApiKey,
}

impl QueryError {
    /// Configuration problems the caller can fix by loading a corpus.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            QueryError::NotLoaded | QueryError::Processing(IndexError::EmptyCorpus)
        )
    }
}
