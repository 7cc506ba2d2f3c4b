// Sample-rate degradation: resample down to the target rate and straight
// back up. The round trip through the lower rate strips everything above
// its Nyquist and leaves the smeared top end of genuinely low-rate audio,
// while the buffer keeps its original rate and length.

use rubato::{FftFixedInOut, Resampler};

use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};

const CHUNK_FRAMES: usize = 1024;

/// Down/up round trip through `target_sr`. A target at or above the buffer
/// rate is a no-op; a zero target is a parameter error.
pub fn reduce_sample_rate(input: &AudioBuffer, target_sr: u32) -> Result<AudioBuffer> {
    if target_sr == 0 {
        return Err(Error::invalid("sample_rate", "target rate must be positive"));
    }
    let sr = input.sample_rate();
    if target_sr >= sr || input.is_empty() {
        return Ok(input.clone());
    }

    let down = resample(input.samples(), sr, target_sr)?;
    let mut up = resample(&down, target_sr, sr)?;
    up.resize(input.len(), 0.0);
    Ok(AudioBuffer::new(up, sr))
}

/// Whole-buffer FFT resampling. The resampler works in fixed-size chunks
/// and carries a constant delay; the tail is flushed with empty input and
/// the delay prefix dropped, so the output lines up with the input and has
/// the expected rational length.
pub(crate) fn resample(samples: &[f32], from: u32, to: u32) -> Result<Vec<f32>> {
    if from == to || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedInOut::<f32>::new(from as usize, to as usize, CHUNK_FRAMES, 1)?;
    let delay = resampler.output_delay();
    let expected = (samples.len() as f64 * f64::from(to) / f64::from(from)).round() as usize;

    let mut out: Vec<f32> = Vec::with_capacity(expected + delay);
    let mut pos = 0usize;
    while pos < samples.len() {
        let need = resampler.input_frames_next();
        if samples.len() - pos >= need {
            let chunk = [samples[pos..pos + need].to_vec()];
            let frames = resampler.process(&chunk, None)?;
            out.extend_from_slice(&frames[0]);
            pos += need;
        } else {
            let tail = [samples[pos..].to_vec()];
            let frames = resampler.process_partial(Some(&tail), None)?;
            out.extend_from_slice(&frames[0]);
            pos = samples.len();
        }
    }
    while out.len() < delay + expected {
        let frames = resampler.process_partial::<Vec<f32>>(None, None)?;
        if frames[0].is_empty() {
            break;
        }
        out.extend_from_slice(&frames[0]);
    }

    let mut aligned = out.split_off(delay.min(out.len()));
    aligned.resize(expected, 0.0);
    Ok(aligned)
}
