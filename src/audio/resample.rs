use crate::audio::error::AudioError;
use crate::audio::pcm::PcmBuffer;
use rubato::{Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction};
use tracing::{debug, trace};

const LOG_TARGET: &str = "trilingual_scenes::audio::resample";

const CHUNK_SIZE: usize = 512;

/// Converts a buffer to `target_rate` when the output device negotiated a
/// different rate than the speech model produced. Returns the input unchanged
/// when the rates already match.
pub fn resample_to(buffer: &PcmBuffer, target_rate: u32) -> Result<PcmBuffer, AudioError> {
    if buffer.sample_rate == target_rate || buffer.is_empty() {
        return Ok(buffer.clone());
    }
    if buffer.sample_rate == 0 || target_rate == 0 {
        return Err(AudioError::ResamplingError(format!(
            "Cannot resample between {} Hz and {} Hz",
            buffer.sample_rate, target_rate
        )));
    }

    debug!(target: LOG_TARGET, "Resampling {} frames from {} Hz to {} Hz", buffer.frames(), buffer.sample_rate, target_rate);

    let channels = buffer.channels.max(1);
    let planes = deinterleave(&buffer.samples, channels);

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(
        target_rate as f64 / buffer.sample_rate as f64,
        2.0,
        params,
        CHUNK_SIZE,
        channels,
    )
    .map_err(|e| AudioError::ResamplingError(format!("Failed to create resampler: {}", e)))?;

    let total_frames = planes[0].len();
    let expected_frames = (total_frames as f64 * target_rate as f64 / buffer.sample_rate as f64).round() as usize;
    let delay = resampler.output_delay();
    let mut output: Vec<Vec<f32>> = vec![Vec::new(); channels];
    let mut processed = 0;

    while processed < total_frames {
        let needed = resampler.input_frames_next();
        let end = (processed + needed).min(total_frames);
        let chunk: Vec<&[f32]> = planes.iter().map(|p| &p[processed..end]).collect();

        let out = if end - processed == needed {
            resampler.process(chunk.as_slice(), None)
        } else {
            resampler.process_partial(Some(chunk.as_slice()), None)
        }
        .map_err(|e| AudioError::ResamplingError(e.to_string()))?;

        trace!(target: LOG_TARGET, "Resampled frames {}..{} into {} frames", processed, end, out.first().map_or(0, |c| c.len()));
        for (acc, chunk_out) in output.iter_mut().zip(out.iter()) {
            acc.extend_from_slice(chunk_out);
        }
        processed = end;
    }

    // Drain the filter delay
    let tail = resampler
        .process_partial::<&[f32]>(None, None)
        .map_err(|e| AudioError::ResamplingError(e.to_string()))?;
    for (acc, chunk_out) in output.iter_mut().zip(tail.iter()) {
        acc.extend_from_slice(chunk_out);
    }

    // Partial chunks are zero-padded, so trim the filter delay and the padding
    for plane in output.iter_mut() {
        let start = delay.min(plane.len());
        let end = (start + expected_frames).min(plane.len());
        *plane = plane[start..end].to_vec();
    }

    Ok(PcmBuffer {
        samples: interleave(&output),
        sample_rate: target_rate,
        channels,
    })
}

fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channels;
    let mut planes = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (ch, sample) in frame.iter().enumerate() {
            planes[ch].push(*sample);
        }
    }
    planes
}

fn interleave(planes: &[Vec<f32>]) -> Vec<f32> {
    let frames = planes.iter().map(|p| p.len()).min().unwrap_or(0);
    let mut samples = Vec::with_capacity(frames * planes.len());
    for frame in 0..frames {
        for plane in planes {
            samples.push(plane[frame]);
        }
    }
    samples
}
