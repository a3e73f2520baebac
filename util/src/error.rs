use thiserror::Error;

/// Errors raised by the helpers in this crate
#[derive(Debug, Error)]
pub enum UtilError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("decompressed payload is not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
