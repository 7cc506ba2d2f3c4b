// Background-texture mixing.

use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};

/// Mixes `background` into `buffer` at `level`, tiling the texture when it
/// is shorter than the signal and cropping it when longer, so the output
/// length always equals the signal's. If the mix pushes the peak above 1.0
/// the whole result is rescaled to a 0.95 peak instead of clipping.
pub fn mix_background(buffer: &mut AudioBuffer, background: &AudioBuffer, level: f32) -> Result<()> {
    if !level.is_finite() || level < 0.0 {
        return Err(Error::invalid(
            "dust_level",
            format!("{level} is not a non-negative mix level"),
        ));
    }
    if level == 0.0 || background.is_empty() || buffer.is_empty() {
        return Ok(());
    }

    let texture = background.samples();
    for (i, sample) in buffer.samples_mut().iter_mut().enumerate() {
        *sample += texture[i % texture.len()] * level;
    }

    let peak = buffer.peak();
    if peak > 1.0 {
        let scale = 0.95 / peak;
        for sample in buffer.samples_mut() {
            *sample *= scale;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorter_texture_is_tiled_to_the_signal_length() {
        let mut buf = AudioBuffer::silence(10, 44_100);
        let texture = AudioBuffer::new(vec![0.1, 0.2, 0.3], 44_100);
        mix_background(&mut buf, &texture, 1.0).unwrap();

        assert_eq!(buf.len(), 10);
        assert!((buf.samples()[0] - 0.1).abs() < 1e-6);
        assert!((buf.samples()[3] - 0.1).abs() < 1e-6);
        assert!((buf.samples()[9] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn longer_texture_is_cropped() {
        let mut buf = AudioBuffer::silence(4, 44_100);
        let texture = AudioBuffer::new(vec![0.1; 100], 44_100);
        mix_background(&mut buf, &texture, 0.5).unwrap();

        assert_eq!(buf.len(), 4);
        for &s in buf.samples() {
            assert!((s - 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn overflowing_mix_is_renormalized_below_one() {
        let mut buf = AudioBuffer::new(vec![0.9; 64], 44_100);
        let texture = AudioBuffer::new(vec![0.9; 64], 44_100);
        mix_background(&mut buf, &texture, 1.0).unwrap();

        assert!((buf.peak() - 0.95).abs() < 1e-5);
    }

    #[test]
    fn in_range_mix_is_left_unscaled() {
        let mut buf = AudioBuffer::new(vec![0.3; 8], 44_100);
        let texture = AudioBuffer::new(vec![0.2; 8], 44_100);
        mix_background(&mut buf, &texture, 0.5).unwrap();

        for &s in buf.samples() {
            assert!((s - 0.4).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_texture_and_zero_level_are_no_ops() {
        let mut buf = AudioBuffer::new(vec![0.3; 8], 44_100);
        let before = buf.clone();

        mix_background(&mut buf, &AudioBuffer::new(Vec::new(), 44_100), 0.5).unwrap();
        assert_eq!(buf.samples(), before.samples());

        let texture = AudioBuffer::new(vec![0.2; 8], 44_100);
        mix_background(&mut buf, &texture, 0.0).unwrap();
        assert_eq!(buf.samples(), before.samples());
    }

    #[test]
    fn negative_level_is_rejected() {
        let mut buf = AudioBuffer::silence(8, 44_100);
        let texture = AudioBuffer::new(vec![0.2; 8], 44_100);
        assert!(mix_background(&mut buf, &texture, -0.1).is_err());
    }
}
