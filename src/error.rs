//! Error type for codec session operations.

use thiserror::Error;

/// Error type for Opus session operations.
///
/// Each variant carries the engine's diagnostic message (from
/// `opus_strerror`). The sentinel-valued bridge in [`crate::bridge`] never
/// returns these to the caller; they are available on the session types for
/// callers that need the cause.
#[derive(Error, Debug)]
pub enum Error {
    /// The engine rejected the session parameters or allocation failed.
    #[error("opus: create failed: {0}")]
    CreateFailed(String),

    /// Decoding failed: malformed packet, unsupported configuration, or
    /// output buffer too small.
    #[error("opus: decode failed: {0}")]
    DecodeFailed(String),

    /// Encoding failed: invalid frame size for the configured sample rate,
    /// or output buffer too small.
    #[error("opus: encode failed: {0}")]
    EncodeFailed(String),

    /// A CTL request on the encoder failed.
    #[error("opus: set option failed: {0}")]
    SetOptionFailed(String),
}
