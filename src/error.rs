use thiserror::Error;

#[derive(Error, Debug)]
pub enum DimuForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML Error: {0}")]
    Xml(String),

    #[error("Decision Tree Format Error: {0}")]
    TreeFormat(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Unknown Variable: '{0}'")]
    UnknownVariable(String),
}

pub type DfResult<T> = Result<T, DimuForgeError>;
