// Additive noise textures: broadband hiss and intermittent static. Both
// draw from the caller's random source, so results are reproducible under
// a fixed seed and safe across concurrent invocations.

use std::f32::consts::TAU;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};

/// Adds zero-mean Gaussian noise with deviation `factor x stddev(signal)`.
/// Silence (or a zero factor) leaves the buffer untouched.
pub fn add_noise<R: Rng>(buffer: &mut AudioBuffer, factor: f32, rng: &mut R) -> Result<()> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(Error::invalid(
            "noise_factor",
            format!("{factor} is not a non-negative scale"),
        ));
    }
    let sigma = factor * std_dev(buffer.samples());
    if sigma <= 0.0 {
        return Ok(());
    }
    let normal = Normal::new(0.0f32, sigma)
        .map_err(|e| Error::invalid("noise_factor", e.to_string()))?;
    for sample in buffer.samples_mut() {
        *sample += normal.sample(rng);
    }
    Ok(())
}

/// Adds unit-variance Gaussian noise scaled by `level` under a slow
/// sinusoidal envelope `0.5 * (1 + sin(2*pi*freq*t))`, `t` sweeping 0..1
/// over the buffer. The envelope is what makes the static audibly come and
/// go instead of sitting at a constant level.
pub fn add_static<R: Rng>(
    buffer: &mut AudioBuffer,
    level: f32,
    freq: f32,
    rng: &mut R,
) -> Result<()> {
    if !level.is_finite() || level < 0.0 {
        return Err(Error::invalid(
            "static_level",
            format!("{level} is not a non-negative amplitude"),
        ));
    }
    if !freq.is_finite() || freq <= 0.0 {
        return Err(Error::invalid(
            "static_freq",
            format!("{freq} is not a positive envelope frequency"),
        ));
    }
    if level == 0.0 || buffer.is_empty() {
        return Ok(());
    }
    let normal = Normal::new(0.0f32, 1.0)
        .map_err(|e| Error::invalid("static_level", e.to_string()))?;
    let n = buffer.len();
    let step = if n > 1 { 1.0 / (n - 1) as f32 } else { 0.0 };
    for (i, sample) in buffer.samples_mut().iter_mut().enumerate() {
        let t = i as f32 * step;
        let envelope = 0.5 * (1.0 + (TAU * freq * t).sin());
        *sample += normal.sample(rng) * level * envelope;
    }
    Ok(())
}

/// Population standard deviation, as the noise scale reference.
fn std_dev(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&s| f64::from(s)).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|&s| (f64::from(s) - mean).powi(2))
        .sum::<f64>()
        / n;
    variance.sqrt() as f32
}
