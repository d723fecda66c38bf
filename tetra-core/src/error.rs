use thiserror::Error;

/// Errors raised by the platform-independent viewer state
#[derive(Debug, Error)]
pub enum TetraError {
    #[error("viewport must have a non-zero size, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },

    #[error("invalid scene configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse scene configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T, E = TetraError> = std::result::Result<T, E>;
