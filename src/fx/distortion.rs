// Hard-clip drive and bit-depth reduction.

use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};

/// Largest meaningful quantization depth for f32 samples (mantissa width).
const MAX_BITS: u32 = 24;

/// Drives the signal by `amount` and hard-clips to [-1, 1].
pub fn distort(buffer: &mut AudioBuffer, amount: f32) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::invalid(
            "distortion_amount",
            format!("{amount} is not a positive gain"),
        ));
    }
    for sample in buffer.samples_mut() {
        *sample = (*sample * amount).clamp(-1.0, 1.0);
    }
    Ok(())
}

/// Quantizes each sample to `2^(bits-1)` levels: scale, round, rescale.
/// Reapplying with the same depth is a no-op.
pub fn bitcrush(buffer: &mut AudioBuffer, bits: u32) -> Result<()> {
    if bits == 0 || bits > MAX_BITS {
        return Err(Error::invalid(
            "bit_depth",
            format!("{bits} is outside 1..={MAX_BITS}"),
        ));
    }
    let scale = (1u32 << (bits - 1)) as f32;
    for sample in buffer.samples_mut() {
        *sample = (*sample * scale).round() / scale;
    }
    Ok(())
}
