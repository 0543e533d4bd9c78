//! Audio output context shared by the card controller.

use crate::audio::alsa_handler::AlsaPcmHandler;
use crate::audio::error::AudioError;
use crate::audio::pcm::PcmBuffer;
use crate::audio::{resample, sample_converter};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

const LOG_TARGET: &str = "trilingual_scenes::audio::output";

/// A platform sink that plays decoded buffers.
///
/// `play` blocks until the buffer has been handed to the device, so callers
/// on the async side run it through [`play_on_shared`].
pub trait AudioSink: Send {
    fn play(&mut self, buffer: &PcmBuffer) -> Result<(), AudioError>;
}

/// Sink handle owned by the card controller and cloned into playback tasks.
pub type SharedAudioSink = Arc<Mutex<Box<dyn AudioSink>>>;

pub fn shared(sink: Box<dyn AudioSink>) -> SharedAudioSink {
    Arc::new(Mutex::new(sink))
}

/// Plays `buffer` on a blocking thread.
pub async fn play_on_shared(sink: SharedAudioSink, buffer: PcmBuffer) -> Result<(), AudioError> {
    tokio::task::spawn_blocking(move || {
        let mut guard = sink
            .lock()
            .map_err(|e| AudioError::InvalidState(format!("Audio sink mutex poisoned: {}", e)))?;
        guard.play(&buffer)
    })
    .await?
}

/// ALSA-backed sink. The PCM device is opened lazily on the first buffer and
/// reused afterwards; it is closed when the sink is dropped.
pub struct AlsaOutput {
    handler: AlsaPcmHandler,
}

impl AlsaOutput {
    pub fn new(device_name: &str) -> Self {
        AlsaOutput {
            handler: AlsaPcmHandler::new(device_name),
        }
    }

    fn ensure_ready(&mut self, buffer: &PcmBuffer) -> Result<(), AudioError> {
        let needs_init = !self.handler.is_open() || self.handler.requested_rate() != Some(buffer.sample_rate);
        if needs_init {
            info!(target: LOG_TARGET, "Creating audio output context at {} Hz.", buffer.sample_rate);
            self.handler.initialize(buffer.sample_rate, buffer.channels.max(1))?;
        } else {
            self.handler.resume_if_suspended()?;
        }
        Ok(())
    }
}

impl AudioSink for AlsaOutput {
    #[instrument(skip(self, buffer), fields(frames = buffer.frames(), rate = buffer.sample_rate))]
    fn play(&mut self, buffer: &PcmBuffer) -> Result<(), AudioError> {
        if buffer.is_empty() {
            debug!(target: LOG_TARGET, "Empty buffer, nothing to play.");
            return Ok(());
        }
        self.ensure_ready(buffer)?;

        let device_rate = self
            .handler
            .actual_rate()
            .ok_or_else(|| AudioError::InitializationError("ALSA handler did not report a rate".to_string()))?;
        let resampled = resample::resample_to(buffer, device_rate)?;
        let s16 = sample_converter::f32_to_s16(&resampled.samples);

        debug!(target: LOG_TARGET, "Writing {} samples ({:.2}s) to ALSA.", s16.len(), resampled.duration_secs());
        self.handler.write_all(&s16)?;
        self.handler.drain()
    }
}
