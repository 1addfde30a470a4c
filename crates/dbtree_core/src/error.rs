use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
