use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Media sink rejected the request: {0}")]
    SinkRejected(String),

    #[error("Remote channel unavailable: {0}")]
    ChannelUnavailable(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
