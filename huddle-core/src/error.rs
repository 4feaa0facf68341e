use thiserror::Error;

/// Reasons a text frame could not be turned into a signaling message.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown op '{0}'")]
    UnknownOp(String),

    #[error("op '{0}' carries no body")]
    MissingBody(String),
}
