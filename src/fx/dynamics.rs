// Dynamic-range compression with an attack/release gain envelope.

use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};

/// Compresses everything above `threshold` (linear) by `ratio`:1.
///
/// The gain envelope follows the instantaneous absolute level sample by
/// sample: when the required reduction grows, the envelope walks toward it
/// at the attack rate; when it shrinks, at the (slower) release rate; below
/// threshold the gain snaps back to unity. The scan is inherently
/// sequential (each sample's gain depends on the previous one), so it runs
/// as a plain left-to-right fold. A capped makeup gain (at most 2x,
/// targeting a 0.95 peak) restores the level afterwards.
pub fn compress(
    buffer: &mut AudioBuffer,
    threshold: f32,
    ratio: f32,
    attack_ms: f32,
    release_ms: f32,
) -> Result<()> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(Error::invalid(
            "threshold",
            format!("{threshold} is not a positive linear level"),
        ));
    }
    if !ratio.is_finite() || ratio < 1.0 {
        return Err(Error::invalid(
            "compression_ratio",
            format!("{ratio} must be at least 1"),
        ));
    }
    if !attack_ms.is_finite() || attack_ms <= 0.0 {
        return Err(Error::invalid(
            "attack_ms",
            format!("{attack_ms} is not a positive duration"),
        ));
    }
    if !release_ms.is_finite() || release_ms <= 0.0 {
        return Err(Error::invalid(
            "release_ms",
            format!("{release_ms} is not a positive duration"),
        ));
    }

    let sr = buffer.sample_rate() as f32;
    let attack_samples = ((sr * attack_ms / 1000.0) as usize).max(1) as f32;
    let release_samples = ((sr * release_ms / 1000.0) as usize).max(1) as f32;

    let mut previous = 1.0f32;
    let mut first = true;
    for sample in buffer.samples_mut() {
        let level = sample.abs();
        let gain = if level > threshold {
            // level > threshold > 0, so the division is well defined.
            let reduction = ((level - threshold) * (1.0 - 1.0 / ratio)) / level;
            let target = 1.0 - reduction;
            if first {
                target
            } else if reduction > previous {
                (previous + (1.0 - previous) / attack_samples).min(target)
            } else {
                (previous - previous / release_samples).max(target)
            }
        } else {
            1.0
        };
        *sample *= gain;
        previous = gain;
        first = false;
    }

    // Makeup gain, capped so near-silent buffers are not boosted into noise.
    let peak = buffer.peak();
    if peak > 0.0 {
        let makeup = (0.95 / peak).min(2.0);
        for sample in buffer.samples_mut() {
            *sample *= makeup;
        }
    }
    Ok(())
}
