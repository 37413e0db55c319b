use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Playback error: {0}")]
    Playback(#[from] core_playback::PlaybackError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Receiver service is not running")]
    ServiceStopped,

    #[error("Receiver task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
