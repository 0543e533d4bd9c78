//! Speech decoding and playback

mod alsa_handler;
mod error;
mod output;
mod pcm;
pub mod resample;
pub mod sample_converter;

pub use error::AudioError;
pub use output::{play_on_shared, shared, AlsaOutput, AudioSink, SharedAudioSink};
pub use pcm::{decode_pcm16le, PcmBuffer, DEFAULT_SAMPLE_RATE, PCM16_SCALE};
