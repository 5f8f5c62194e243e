use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid journal document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Journal store unavailable: {0}")]
    Unavailable(String),
}
