//! Decoder session over a native Opus decoder instance.

use std::os::raw::c_int;
use std::ptr;

use crate::error::Error;
use crate::ffi;

/// Stateful Opus decoder session.
///
/// Owns one native decoder instance for its whole lifetime; the instance is
/// destroyed exactly once, on drop. Opus decoders carry inter-frame state
/// (packet history, concealment), so a session must be fed a single stream
/// in order.
pub struct Decoder {
    sample_rate: i32,
    channels: i32,
    handle: *mut ffi::OpusDecoder,
}

// Safety: the native instance is exclusively owned and never aliased.
unsafe impl Send for Decoder {}

impl Drop for Decoder {
    fn drop(&mut self) {
        unsafe { ffi::opus_decoder_destroy(self.handle) };
    }
}

impl Decoder {
    /// Creates a decoder session.
    ///
    /// `sample_rate` must be 8000, 12000, 16000, 24000 or 48000 and
    /// `channels` 1 or 2; the engine validates and rejects anything else.
    pub fn new(sample_rate: i32, channels: i32) -> Result<Self, Error> {
        let mut error: c_int = 0;
        let handle = unsafe { ffi::opus_decoder_create(sample_rate, channels, &mut error) };

        if handle.is_null() || error != ffi::OPUS_OK {
            return Err(Error::CreateFailed(ffi::error_string(error)));
        }

        Ok(Self {
            sample_rate,
            channels,
            handle,
        })
    }

    /// Returns the sample rate.
    pub fn sample_rate(&self) -> i32 {
        self.sample_rate
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> i32 {
        self.channels
    }

    /// Decodes one compressed packet into `out` as 16-bit little-endian PCM.
    ///
    /// The capacity of `out` bounds the decode: at most
    /// `out.len() / 2 / channels` samples per channel are requested from the
    /// engine, and the write never exceeds `out.len()` bytes. An empty
    /// `packet` is the frame-loss signal; it is forwarded to the engine as a
    /// null packet so it can run concealment.
    ///
    /// Returns the number of bytes written.
    pub fn decode(&mut self, packet: &[u8], out: &mut [u8]) -> Result<usize, Error> {
        let frame_size = out.len() / 2 / self.channels as usize;
        let mut pcm = vec![0i16; frame_size * self.channels as usize];

        let (data, len) = if packet.is_empty() {
            (ptr::null(), 0)
        } else {
            (packet.as_ptr(), packet.len() as ffi::OpusInt32)
        };

        let n = unsafe {
            ffi::opus_decode(
                self.handle,
                data,
                len,
                pcm.as_mut_ptr(),
                frame_size as c_int,
                0, // decode_fec
            )
        };

        if n < 0 {
            return Err(Error::DecodeFailed(ffi::error_string(n)));
        }

        let produced = n as usize * self.channels as usize;
        for (dst, sample) in out.chunks_exact_mut(2).zip(&pcm[..produced]) {
            dst.copy_from_slice(&sample.to_le_bytes());
        }

        Ok(produced * 2)
    }

    /// Decodes into a freshly allocated buffer of capacity `max_bytes`,
    /// trimmed to the decoded length.
    pub fn decode_to_vec(&mut self, packet: &[u8], max_bytes: usize) -> Result<Vec<u8>, Error> {
        let mut out = vec![0u8; max_bytes];
        let n = self.decode(packet, &mut out)?;
        out.truncate(n);
        Ok(out)
    }
}
