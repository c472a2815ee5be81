use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record at line {line}: {reason}")]
    MalformedEvent { line: usize, reason: String },

    #[error("Offer '{offer_id}' appears more than once in the catalog")]
    DuplicateOffer { offer_id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnalysisError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedEvent { line, reason: reason.into() }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
