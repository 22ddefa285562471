use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unknown export column: {0}")]
    UnknownColumn(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
