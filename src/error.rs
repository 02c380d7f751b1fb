use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArsipError {
    #[error("Data directory not initialized. Run 'arsipku init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove the data directory to reinitialize.")]
    AlreadyInitialized,

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArsipError>;
