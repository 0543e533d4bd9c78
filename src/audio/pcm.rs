//! Raw PCM decoding for speech payloads.
//!
//! The speech model returns headerless signed 16-bit little-endian mono PCM.
//! Container-oriented decoders reject that, so the samples are normalised here
//! directly into a float buffer the output sink can play.

use tracing::trace;

const LOG_TARGET: &str = "trilingual_scenes::audio::pcm";

/// Sample rate of the speech model's raw PCM output.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Divisor mapping an i16 sample onto [-1.0, 1.0).
pub const PCM16_SCALE: f32 = 32768.0;

/// A decoded, playable sample buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl PcmBuffer {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Decodes mono S16LE bytes into normalised f32 samples.
///
/// An empty input gives an empty buffer. A trailing odd byte is not a whole
/// sample and is ignored.
pub fn decode_pcm16le(bytes: &[u8], sample_rate: u32) -> PcmBuffer {
    if bytes.len() % 2 != 0 {
        trace!(target: LOG_TARGET, "Ignoring trailing byte of odd-length PCM payload ({} bytes)", bytes.len());
    }

    let samples = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / PCM16_SCALE)
        .collect::<Vec<f32>>();

    trace!(target: LOG_TARGET, "Decoded {} samples at {} Hz", samples.len(), sample_rate);

    PcmBuffer {
        samples,
        sample_rate,
        channels: 1,
    }
}
