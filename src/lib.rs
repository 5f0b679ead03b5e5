//! Handle-based session bridge over libopus for real-time PCM encode and
//! decode.
//!
//! Two symmetric session types sit over one direction of codec flow each:
//! [`Decoder`] turns compressed Opus packets into 16-bit little-endian PCM,
//! [`Encoder`] turns PCM frames into Opus packets with a fixed quality
//! configuration. Both own their native instance exclusively and free it on
//! drop.
//!
//! External callers that address sessions by opaque integer handles go
//! through [`DecoderBridge`] / [`EncoderBridge`]: creation yields a non-zero
//! handle (`0` on failure), data calls return a byte count (`-1` on
//! failure), and release is idempotent. Handles are validated against a
//! liveness table on every call, so stale or forged values fail cleanly.
//!
//! # Example
//!
//! ```ignore
//! use opus_bridge::{Application, DecoderBridge, EncoderBridge};
//!
//! let encoders = EncoderBridge::new();
//! let decoders = DecoderBridge::new();
//!
//! let eh = encoders.create(16000, 1, Application::Voip);
//! let dh = decoders.create(16000, 1);
//!
//! // One 20ms PCM frame at 16kHz mono: 320 samples, 640 bytes.
//! let pcm = vec![0u8; 640];
//! let mut packet = vec![0u8; 4000];
//! let n = encoders.encode(eh, &pcm, &mut packet);
//!
//! let mut decoded = vec![0u8; 640];
//! let m = decoders.decode(dh, &packet[..n as usize], &mut decoded);
//!
//! encoders.release(eh);
//! decoders.release(dh);
//! ```

mod bridge;
mod decoder;
mod encoder;
mod error;
mod ffi;
mod registry;

pub use bridge::{
    CODEC_FAILED, DecoderBridge, EncoderBridge, INVALID_HANDLE, MAX_COMPLEXITY, TARGET_BITRATE,
};
pub use decoder::Decoder;
pub use encoder::{Application, Encoder};
pub use error::Error;
pub use registry::{Handle, Registry};
