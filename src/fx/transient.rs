// Push-to-talk click synthesis.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};
use crate::fx::filter;

const CLICK_SECS: f32 = 0.03;
const CLICK_BAND_LOW_HZ: f32 = 800.0;
const CLICK_BAND_HIGH_HZ: f32 = 3000.0;
const CLICK_FILTER_ORDER: usize = 2;
const START_CLICK_GAIN: f32 = 0.2;
const END_CLICK_GAIN: f32 = 0.15;

/// Prepends a 30 ms button click and appends its time-reversed, quieter
/// twin. The click is band-passed Gaussian noise under an exponential decay
/// envelope. Output length is the input plus two click bursts.
pub fn add_ptt_clicks<R: Rng>(input: &AudioBuffer, rng: &mut R) -> Result<AudioBuffer> {
    let sr = input.sample_rate();
    let n_click = ((CLICK_SECS * sr as f32).round() as usize).max(1);

    let normal = Normal::new(0.0f32, 1.0)
        .map_err(|e| Error::invalid("click_noise", e.to_string()))?;
    let raw: Vec<f32> = (0..n_click).map(|_| normal.sample(rng)).collect();

    let sections =
        filter::bandpass_sections(CLICK_BAND_LOW_HZ, CLICK_BAND_HIGH_HZ, sr, CLICK_FILTER_ORDER)?;
    let filtered = filter::zero_phase(&sections, &raw);

    // Exponential decay from 1 down to e^-5 across the burst.
    let step = if n_click > 1 {
        5.0 / (n_click - 1) as f32
    } else {
        0.0
    };
    let click: Vec<f32> = filtered
        .iter()
        .enumerate()
        .map(|(i, &s)| s * (-(i as f32) * step).exp() * START_CLICK_GAIN)
        .collect();
    let end_click: Vec<f32> = click.iter().rev().map(|&s| s * END_CLICK_GAIN).collect();

    let mut out = Vec::with_capacity(input.len() + 2 * n_click);
    out.extend_from_slice(&click);
    out.extend_from_slice(input.samples());
    out.extend_from_slice(&end_click);
    Ok(AudioBuffer::new(out, sr))
}
