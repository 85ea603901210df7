use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Backend construction failed: {0}")]
    ConstructionFailed(String),

    #[error("Backend rejected command `{command}`: {reason}")]
    CommandRejected { command: String, reason: String },
}

pub type Result<T> = std::result::Result<T, BridgeError>;
