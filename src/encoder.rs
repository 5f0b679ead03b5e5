//! Encoder session over a native Opus encoder instance.

use std::os::raw::c_int;

use crate::error::Error;
use crate::ffi;

/// Opus application profile, selecting the encoder's internal tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Application {
    /// Best quality for voice signals.
    Voip,
    /// Best quality for general audio.
    Audio,
    /// Minimum possible coding delay.
    LowDelay,
}

impl Application {
    fn to_ffi(self) -> c_int {
        match self {
            Self::Voip => ffi::OPUS_APPLICATION_VOIP,
            Self::Audio => ffi::OPUS_APPLICATION_AUDIO,
            Self::LowDelay => ffi::OPUS_APPLICATION_RESTRICTED_LOWDELAY,
        }
    }
}

/// Stateful Opus encoder session.
///
/// Owns one native encoder instance for its whole lifetime; the instance is
/// destroyed exactly once, on drop.
pub struct Encoder {
    sample_rate: i32,
    channels: i32,
    handle: *mut ffi::OpusEncoder,
}

// Safety: the native instance is exclusively owned and never aliased.
unsafe impl Send for Encoder {}

impl Drop for Encoder {
    fn drop(&mut self) {
        unsafe { ffi::opus_encoder_destroy(self.handle) };
    }
}

impl Encoder {
    /// Creates an encoder session.
    ///
    /// `sample_rate` must be 8000, 12000, 16000, 24000 or 48000 and
    /// `channels` 1 or 2; the engine validates and rejects anything else.
    pub fn new(sample_rate: i32, channels: i32, application: Application) -> Result<Self, Error> {
        let mut error: c_int = 0;
        let handle = unsafe {
            ffi::opus_encoder_create(sample_rate, channels, application.to_ffi(), &mut error)
        };

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

    /// Number of samples per channel in a frame of `frame_ms` milliseconds.
    pub fn samples_per_frame(&self, frame_ms: u32) -> usize {
        self.sample_rate as usize * frame_ms as usize / 1000
    }

    /// Encodes one PCM frame into `out` and returns the compressed byte
    /// count.
    ///
    /// `pcm` holds interleaved samples for all channels and must cover a
    /// frame duration the configured sample rate accepts (2.5 to 60 ms).
    /// The write never exceeds `out.len()` bytes.
    pub fn encode(&mut self, pcm: &[i16], out: &mut [u8]) -> Result<usize, Error> {
        let frame_size = pcm.len() / self.channels as usize;

        let n = unsafe {
            ffi::opus_encode(
                self.handle,
                pcm.as_ptr(),
                frame_size as c_int,
                out.as_mut_ptr(),
                out.len() as ffi::OpusInt32,
            )
        };

        if n < 0 {
            return Err(Error::EncodeFailed(ffi::error_string(n)));
        }

        Ok(n as usize)
    }

    /// Encodes one PCM frame given as raw little-endian bytes.
    ///
    /// The byte length is interpreted as `pcm.len() / 2` interleaved
    /// samples; an odd trailing byte is silently dropped.
    pub fn encode_bytes(&mut self, pcm: &[u8], out: &mut [u8]) -> Result<usize, Error> {
        let samples: Vec<i16> = pcm
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        self.encode(&samples, out)
    }

    /// Sets the target bitrate in bits per second.
    pub fn set_bitrate(&mut self, bitrate: i32) -> Result<(), Error> {
        self.ctl(ffi::OPUS_SET_BITRATE_REQUEST, bitrate)
    }

    /// Sets the encoder complexity (0-10).
    pub fn set_complexity(&mut self, complexity: i32) -> Result<(), Error> {
        self.ctl(ffi::OPUS_SET_COMPLEXITY_REQUEST, complexity)
    }

    fn ctl(&mut self, request: c_int, value: i32) -> Result<(), Error> {
        let ret = unsafe { ffi::opus_encoder_ctl(self.handle, request, value) };
        if ret != ffi::OPUS_OK {
            return Err(Error::SetOptionFailed(ffi::error_string(ret)));
        }
        Ok(())
    }
}
