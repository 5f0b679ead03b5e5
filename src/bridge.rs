//! Sentinel-valued boundary around the codec sessions.
//!
//! This is the surface an external caller drives: `create` returns an opaque
//! non-zero handle or [`INVALID_HANDLE`], the data calls return a byte count
//! or [`CODEC_FAILED`], and `release` is idempotent and silent. The engine's
//! diagnostic is logged, never returned; callers that need the cause use
//! [`Decoder`](crate::Decoder) / [`Encoder`](crate::Encoder) directly.

use tracing::{debug, warn};

use crate::decoder::Decoder;
use crate::encoder::{Application, Encoder};
use crate::registry::{Handle, Registry};

/// Handle value returned when session creation fails.
pub const INVALID_HANDLE: Handle = 0;

/// Value returned when a decode or encode call fails.
pub const CODEC_FAILED: i32 = -1;

/// Bitrate applied to every encoder session at creation, bits per second.
pub const TARGET_BITRATE: i32 = 64_000;

/// Complexity applied to every encoder session at creation (maximum).
pub const MAX_COMPLEXITY: i32 = 10;

/// Handle-addressed decoder sessions.
#[derive(Default)]
pub struct DecoderBridge {
    sessions: Registry<Decoder>,
}

impl DecoderBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder session and returns its handle, or
    /// [`INVALID_HANDLE`] when the engine rejects the parameters.
    pub fn create(&self, sample_rate: i32, channels: i32) -> Handle {
        match Decoder::new(sample_rate, channels) {
            Ok(decoder) => self.sessions.insert(decoder),
            Err(e) => {
                warn!("decoder create({}, {}) failed: {}", sample_rate, channels, e);
                INVALID_HANDLE
            }
        }
    }

    /// Decodes one packet into `out` as 16-bit little-endian PCM and returns
    /// the byte count, in `[0, out.len()]`. An empty `packet` signals frame
    /// loss. Returns [`CODEC_FAILED`] when the handle is unknown or released,
    /// or when the engine reports an error.
    pub fn decode(&self, handle: Handle, packet: &[u8], out: &mut [u8]) -> i32 {
        match self.sessions.with(handle, |decoder| decoder.decode(packet, out)) {
            Some(Ok(n)) => n as i32,
            Some(Err(e)) => {
                debug!("decode on handle {} failed: {}", handle, e);
                CODEC_FAILED
            }
            None => {
                debug!("decode on unknown handle {}", handle);
                CODEC_FAILED
            }
        }
    }

    /// Releases the session behind `handle`, freeing the native instance.
    /// Unknown or already released handles are ignored.
    pub fn release(&self, handle: Handle) {
        self.sessions.remove(handle);
    }

    /// Number of live decoder sessions.
    pub fn active(&self) -> usize {
        self.sessions.len()
    }
}

/// Handle-addressed encoder sessions with fixed quality configuration.
#[derive(Default)]
pub struct EncoderBridge {
    sessions: Registry<Encoder>,
}

impl EncoderBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder session, applies [`TARGET_BITRATE`] and
    /// [`MAX_COMPLEXITY`], and returns its handle. Returns
    /// [`INVALID_HANDLE`] when the engine rejects the parameters or the
    /// fixed configuration cannot be applied; the instance is destroyed and
    /// no handle is published in that case.
    pub fn create(&self, sample_rate: i32, channels: i32, application: Application) -> Handle {
        let mut encoder = match Encoder::new(sample_rate, channels, application) {
            Ok(encoder) => encoder,
            Err(e) => {
                warn!(
                    "encoder create({}, {}, {:?}) failed: {}",
                    sample_rate, channels, application, e
                );
                return INVALID_HANDLE;
            }
        };

        if let Err(e) = encoder
            .set_bitrate(TARGET_BITRATE)
            .and_then(|_| encoder.set_complexity(MAX_COMPLEXITY))
        {
            warn!("encoder configuration failed: {}", e);
            return INVALID_HANDLE;
        }

        self.sessions.insert(encoder)
    }

    /// Encodes one PCM frame (raw 16-bit little-endian bytes, interpreted as
    /// `pcm.len() / 2` interleaved samples with an odd trailing byte
    /// dropped) into `out` and returns the compressed byte count. Returns
    /// [`CODEC_FAILED`] when the handle is unknown or released, or when the
    /// engine reports an error.
    pub fn encode(&self, handle: Handle, pcm: &[u8], out: &mut [u8]) -> i32 {
        match self.sessions.with(handle, |encoder| encoder.encode_bytes(pcm, out)) {
            Some(Ok(n)) => n as i32,
            Some(Err(e)) => {
                debug!("encode on handle {} failed: {}", handle, e);
                CODEC_FAILED
            }
            None => {
                debug!("encode on unknown handle {}", handle);
                CODEC_FAILED
            }
        }
    }

    /// Releases the session behind `handle`, freeing the native instance.
    /// Unknown or already released handles are ignored.
    pub fn release(&self, handle: Handle) {
        self.sessions.remove(handle);
    }

    /// Number of live encoder sessions.
    pub fn active(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_one_frame(encoders: &EncoderBridge, handle: Handle) -> Vec<u8> {
        let pcm = vec![0u8; 640]; // 20ms of silence at 16kHz mono
        let mut out = vec![0u8; 4000];
        let n = encoders.encode(handle, &pcm, &mut out);
        assert!(n > 0);
        out.truncate(n as usize);
        out
    }

    #[test]
    fn test_decoder_lifecycle_scenario() {
        let encoders = EncoderBridge::new();
        let decoders = DecoderBridge::new();

        let eh = encoders.create(16000, 1, Application::Voip);
        assert_ne!(eh, INVALID_HANDLE);
        let packet = encode_one_frame(&encoders, eh);

        let dh = decoders.create(16000, 1);
        assert_ne!(dh, INVALID_HANDLE);

        let mut out = vec![0u8; 640];
        let n = decoders.decode(dh, &packet, &mut out);
        assert!(n >= 0 && n as usize <= out.len());

        decoders.release(dh);
        assert_eq!(decoders.decode(dh, &packet, &mut out), CODEC_FAILED);

        encoders.release(eh);
    }

    #[test]
    fn test_create_failure_returns_invalid_handle() {
        let decoders = DecoderBridge::new();
        assert_eq!(decoders.create(44100, 1), INVALID_HANDLE);

        let encoders = EncoderBridge::new();
        assert_eq!(encoders.create(44100, 1, Application::Voip), INVALID_HANDLE);
    }

    #[test]
    fn test_handle_uniqueness_across_sessions() {
        let decoders = DecoderBridge::new();
        let handles: Vec<Handle> = (0..4).map(|_| decoders.create(16000, 1)).collect();
        for (i, &h) in handles.iter().enumerate() {
            assert_ne!(h, INVALID_HANDLE);
            assert!(!handles[..i].contains(&h));
        }

        // Releasing one session leaves the others usable.
        decoders.release(handles[0]);
        assert_eq!(decoders.active(), 3);
        let mut out = vec![0u8; 640];
        assert!(decoders.decode(handles[1], &[], &mut out) >= 0);
    }

    #[test]
    fn test_invalid_handle_is_safe() {
        let decoders = DecoderBridge::new();
        let encoders = EncoderBridge::new();
        let mut out = vec![0u8; 640];

        assert_eq!(decoders.decode(INVALID_HANDLE, &[1, 2, 3], &mut out), CODEC_FAILED);
        assert_eq!(decoders.decode(9999, &[1, 2, 3], &mut out), CODEC_FAILED);
        assert_eq!(encoders.encode(INVALID_HANDLE, &[0; 640], &mut out), CODEC_FAILED);
        assert_eq!(encoders.encode(9999, &[0; 640], &mut out), CODEC_FAILED);

        decoders.release(INVALID_HANDLE);
        encoders.release(9999);
    }

    #[test]
    fn test_double_release_is_safe() {
        let decoders = DecoderBridge::new();
        let h = decoders.create(16000, 1);
        assert_ne!(h, INVALID_HANDLE);

        decoders.release(h);
        decoders.release(h);
        assert_eq!(decoders.active(), 0);
    }

    #[test]
    fn test_decode_capacity_bound() {
        let encoders = EncoderBridge::new();
        let decoders = DecoderBridge::new();

        let eh = encoders.create(16000, 1, Application::Voip);
        let packet = encode_one_frame(&encoders, eh);

        let dh = decoders.create(16000, 1);
        let mut small = vec![0u8; 10];
        assert_eq!(decoders.decode(dh, &packet, &mut small), CODEC_FAILED);

        decoders.release(dh);
        encoders.release(eh);
    }

    #[test]
    fn test_encode_truncates_odd_input() {
        let encoders = EncoderBridge::new();
        let h = encoders.create(16000, 1, Application::Voip);

        // 641 bytes is 320 samples plus a stray byte; the stray byte is
        // dropped, so this encodes a valid 20ms frame.
        let pcm = vec![0u8; 641];
        let mut out = vec![0u8; 4000];
        assert!(encoders.encode(h, &pcm, &mut out) > 0);

        encoders.release(h);
    }

    #[test]
    fn test_roundtrip_length() {
        let encoders = EncoderBridge::new();
        let decoders = DecoderBridge::new();

        let eh = encoders.create(16000, 1, Application::Voip);
        let dh = decoders.create(16000, 1);

        let pcm: Vec<u8> = (0..640u32).map(|i| (i % 251) as u8).collect();
        let mut packet = vec![0u8; 4000];
        let n = encoders.encode(eh, &pcm, &mut packet);
        assert!(n > 0);

        let mut decoded = vec![0u8; 640];
        let m = decoders.decode(dh, &packet[..n as usize], &mut decoded);
        assert_eq!(m as usize, pcm.len());

        encoders.release(eh);
        decoders.release(dh);
    }
}
