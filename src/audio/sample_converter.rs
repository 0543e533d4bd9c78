use tracing::trace;

const LOG_TARGET: &str = "trilingual_scenes::audio::sample_converter";

/// Scales f32 samples in [-1.0, 1.0] to interleaved S16LE for the ALSA write path.
pub fn f32_to_s16(samples: &[f32]) -> Vec<i16> {
    trace!(target: LOG_TARGET, "Converting {} f32 samples to S16LE", samples.len());
    samples
        .iter()
        .map(|s| (s * 32768.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect()
}

