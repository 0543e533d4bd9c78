use crate::audio::error::AudioError;
use alsa::nix::errno::Errno;
use alsa::pcm::{Access, Format, HwParams, State as PcmState, PCM};
use alsa::{Direction, ValueOr};
use std::ffi::CString;
use tracing::{debug, error, info, instrument, warn};

const LOG_TARGET: &str = "trilingual_scenes::audio::alsa_handler";

/// Manages the ALSA PCM device used for speech playback.
pub struct AlsaPcmHandler {
    device_name: String,
    pcm: Option<PCM>,
    requested_rate: Option<u32>,
    channels: usize,
    actual_rate: Option<u32>,
}

impl AlsaPcmHandler {
    /// Creates a handler for the specified ALSA device. The device is not opened yet.
    pub fn new(device_name: &str) -> Self {
        debug!(target: LOG_TARGET, "Creating new AlsaPcmHandler for device: {}", device_name);
        AlsaPcmHandler {
            device_name: device_name.to_string(),
            pcm: None,
            requested_rate: None,
            channels: 1,
            actual_rate: None,
        }
    }

    /// Opens the PCM device for S16LE playback at (or near) the given rate.
    /// Closes any existing PCM device first.
    #[instrument(skip(self), fields(device = %self.device_name))]
    pub fn initialize(&mut self, rate: u32, channels: usize) -> Result<(), AudioError> {
        info!(target: LOG_TARGET, "Initializing ALSA PCM device '{}' (rate={}, channels={})", self.device_name, rate, channels);

        self.close();

        let device = CString::new(self.device_name.clone())
            .map_err(|e| AudioError::InitializationError(format!("Invalid device name: {}", e)))?;

        let pcm = PCM::open(&device, Direction::Playback, false)?;

        {
            let hwp = HwParams::any(&pcm)?;
            hwp.set_access(Access::RWInterleaved)?;
            hwp.set_format(Format::s16())?;
            hwp.set_channels(channels as u32)?;

            match hwp.set_rate_near(rate, ValueOr::Nearest) {
                Ok(_) => {
                    let actual_rate = hwp.get_rate()?;
                    if actual_rate != rate {
                        warn!(target: LOG_TARGET, "ALSA rate negotiation: requested={}, actual={}", rate, actual_rate);
                    }
                    self.actual_rate = Some(actual_rate);
                }
                Err(e) => {
                    error!(target: LOG_TARGET, "Failed to set ALSA rate near {}: {}", rate, e);
                    return Err(AudioError::AlsaError(format!("Failed to set sample rate {}: {}", rate, e)));
                }
            }
            pcm.hw_params(&hwp)?;

            let swp = pcm.sw_params_current()?;
            let buffer_size = hwp.get_buffer_size()?;
            let period_size = hwp.get_period_size()?;
            swp.set_start_threshold(buffer_size - period_size)?;
            pcm.sw_params(&swp)?;
            debug!(target: LOG_TARGET, "ALSA parameters applied (buffer={}, period={}).", buffer_size, period_size);
        }

        self.pcm = Some(pcm);
        self.requested_rate = Some(rate);
        self.channels = channels;
        info!(target: LOG_TARGET, "ALSA initialized successfully.");
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.pcm.is_some()
    }

    /// Brings a suspended device (e.g. after system sleep) back to a playable state.
    pub fn resume_if_suspended(&self) -> Result<(), AudioError> {
        let pcm = self.pcm.as_ref().ok_or(AudioError::InvalidState("PCM not initialized".to_string()))?;
        match pcm.state() {
            PcmState::Suspended => {
                info!(target: LOG_TARGET, "ALSA device suspended, resuming.");
                if let Err(e) = pcm.resume() {
                    // Devices without hardware resume need a fresh prepare instead
                    debug!(target: LOG_TARGET, "ALSA resume failed ({}), preparing instead.", e);
                    pcm.prepare()?;
                }
                Ok(())
            }
            PcmState::XRun | PcmState::Setup => {
                debug!(target: LOG_TARGET, "ALSA device in state {:?}, preparing.", pcm.state());
                pcm.prepare()?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Writes interleaved S16LE samples, handling underruns.
    /// Returns Ok(0) if an underrun occurred and was recovered.
    pub fn write_s16_buffer(&self, buffer: &[i16]) -> Result<usize, AudioError> {
        let pcm = self.pcm.as_ref().ok_or(AudioError::InvalidState("PCM not initialized for writing".to_string()))?;
        let io = pcm.io_i16()?;

        match io.writei(buffer) {
            Ok(frames_written) => Ok(frames_written),
            Err(e) if e.errno() == Errno::EPIPE => {
                warn!(target: LOG_TARGET, "ALSA buffer underrun (EPIPE), recovering.");
                pcm.recover(libc::EPIPE, true)
                    .map_err(|recover_err| AudioError::AlsaError(format!("ALSA recovery failed: {}", recover_err)))?;
                Ok(0)
            }
            Err(e) => {
                error!(target: LOG_TARGET, "ALSA write error: {}", e);
                Err(AudioError::AlsaError(e.to_string()))
            }
        }
    }

    /// Writes the whole buffer, retrying after recovered underruns.
    pub fn write_all(&self, mut samples: &[i16]) -> Result<(), AudioError> {
        let channels = self.channels.max(1);
        while !samples.is_empty() {
            let frames = self.write_s16_buffer(samples)?;
            samples = &samples[(frames * channels).min(samples.len())..];
        }
        Ok(())
    }

    /// Waits for queued samples to finish playing.
    pub fn drain(&self) -> Result<(), AudioError> {
        if let Some(pcm) = &self.pcm {
            // Clips shorter than the start threshold never start on their own
            if pcm.state() == PcmState::Prepared {
                pcm.start()?;
            }
            if pcm.state() == PcmState::Running {
                pcm.drain()?;
                // drain leaves the device in Setup; make it writable again
                pcm.prepare()?;
            }
        }
        Ok(())
    }

    /// Closes the ALSA PCM device if it's open.
    pub fn close(&mut self) {
        if let Some(pcm) = self.pcm.take() {
            debug!(target: LOG_TARGET, "Closing ALSA PCM device (state: {:?})...", pcm.state());
            if pcm.state() == PcmState::Running || pcm.state() == PcmState::Prepared {
                if let Err(e) = pcm.drop() {
                    warn!(target: LOG_TARGET, "Error dropping ALSA buffer during close (ignored): {}", e);
                }
            }
        }
        self.actual_rate = None;
        self.requested_rate = None;
    }

    /// Returns the rate negotiated with ALSA during initialization.
    pub fn actual_rate(&self) -> Option<u32> {
        self.actual_rate
    }

    /// Returns the rate requested during initialization.
    pub fn requested_rate(&self) -> Option<u32> {
        self.requested_rate
    }
}

impl Drop for AlsaPcmHandler {
    fn drop(&mut self) {
        debug!(target: LOG_TARGET, "Dropping AlsaPcmHandler.");
        self.close();
    }
}
