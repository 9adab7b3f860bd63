use thiserror::Error;

pub type KitResult<T> = Result<T, KitError>;

#[derive(Error, Debug)]
pub enum KitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Automation error: {0}")]
    Automation(String),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("Import error: {0}")]
    Import(String),
}
