use thiserror::Error;

/// Error types shared by the runtime helpers
#[derive(Error, Debug)]
pub enum HelperError {
    #[error("Missing configuration value: {0}")]
    MissingConfig(String),

    #[error("Missing request header: {0}")]
    MissingHeader(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    #[error("Remote API error: {0}")]
    RemoteApi(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Type alias for Results using HelperError
pub type Result<T> = std::result::Result<T, HelperError>;
