// The optional dust/crackle background texture: loading it from its
// conventional on-disk location, and synthesizing a placeholder when no
// real recording is provisioned. The processing pipeline itself never
// touches the filesystem; it receives an already-loaded buffer.

use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::info;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};
use crate::fx::degrade;

/// Conventional location of the dust texture, relative to the working
/// directory.
pub const DUST_TEXTURE_PATH: &str = "resources/dusteffect.wav";

const PLACEHOLDER_SECS: f32 = 5.0;
const CRACKLE_COUNT: usize = 100;
const CRACKLE_SAMPLES: usize = 10;

/// Reads the texture WAV, downmixes to mono and resamples it to
/// `sample_rate`. A missing file is reported as `ResourceUnavailable` so
/// callers can degrade to running without the mix stage.
pub fn load_dust_texture(path: impl AsRef<Path>, sample_rate: u32) -> Result<AudioBuffer> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ResourceUnavailable(path.display().to_string()));
    }

    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let mono: Vec<f32> = if channels <= 1 {
        samples
    } else {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    let resampled = if spec.sample_rate == sample_rate {
        mono
    } else {
        degrade::resample(&mono, spec.sample_rate, sample_rate)?
    };

    info!(
        "loaded dust texture {} ({} samples at {} Hz)",
        path.display(),
        resampled.len(),
        sample_rate
    );
    Ok(AudioBuffer::new(resampled, sample_rate))
}

/// Synthesizes a placeholder dust texture: a low-level noise bed plus a
/// scattering of short exponentially decaying crackle impulses, normalized
/// to a 0.8 peak. Deterministic for a fixed seed. Meant as a stand-in until
/// a real vinyl/static recording is dropped at [`DUST_TEXTURE_PATH`].
pub fn synthesize_dust<R: Rng>(duration_secs: f32, sample_rate: u32, rng: &mut R) -> AudioBuffer {
    let n = (duration_secs * sample_rate as f32) as usize;
    let bed_noise = Normal::new(0.0f32, 0.1).expect("fixed sigma is valid");

    let mut dust: Vec<f32> = (0..n).map(|_| bed_noise.sample(rng) * 0.3).collect();

    for _ in 0..CRACKLE_COUNT {
        let pos_secs = rng.gen_range(0.0..duration_secs);
        let amp = rng.gen_range(0.0f32..0.4) + 0.1;
        let idx = (pos_secs * sample_rate as f32) as usize;
        if idx + CRACKLE_SAMPLES <= n {
            for j in 0..CRACKLE_SAMPLES {
                dust[idx + j] += rng.gen_range(0.0f32..1.0) * amp * (-(j as f32) / 2.0).exp();
            }
        }
    }

    let peak = dust.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    if peak > 0.0 {
        let scale = 0.8 / peak;
        for sample in &mut dust {
            *sample *= scale;
        }
    }
    AudioBuffer::new(dust, sample_rate)
}

/// Makes sure a dust texture exists under `dir`, synthesizing a placeholder
/// file (16-bit mono WAV) if none is present. Returns the texture path.
pub fn ensure_dust_texture<R: Rng>(
    dir: impl AsRef<Path>,
    sample_rate: u32,
    rng: &mut R,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join("dusteffect.wav");
    if path.exists() {
        return Ok(path);
    }

    let dust = synthesize_dust(PLACEHOLDER_SECS, sample_rate, rng);
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec)?;
    for sample in dust.into_samples() {
        writer.write_sample((sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16)?;
    }
    writer.finalize()?;

    info!("created placeholder dust texture at {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use tempfile::TempDir;

    #[test]
    fn missing_texture_reports_resource_unavailable() {
        let err = load_dust_texture("no/such/file.wav", 44_100).unwrap_err();
        assert!(matches!(err, Error::ResourceUnavailable(_)));
    }

    #[test]
    fn synthesized_dust_is_deterministic_and_normalized() {
        let mut rng_a = Pcg32::seed_from_u64(1234);
        let mut rng_b = Pcg32::seed_from_u64(1234);
        let a = synthesize_dust(1.0, 22_050, &mut rng_a);
        let b = synthesize_dust(1.0, 22_050, &mut rng_b);

        assert_eq!(a.samples(), b.samples());
        assert_eq!(a.len(), 22_050);
        assert!((a.peak() - 0.8).abs() < 1e-5);
    }

    #[test]
    fn ensure_writes_once_and_load_round_trips() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let mut rng = Pcg32::seed_from_u64(77);

        let path = ensure_dust_texture(tmp.path(), 22_050, &mut rng)?;
        assert!(path.exists());

        // Second call must not rewrite the file.
        let before = fs::metadata(&path)?.len();
        let path_again = ensure_dust_texture(tmp.path(), 22_050, &mut rng)?;
        assert_eq!(path, path_again);
        assert_eq!(fs::metadata(&path)?.len(), before);

        let texture = load_dust_texture(&path, 22_050)?;
        assert_eq!(texture.sample_rate(), 22_050);
        assert_eq!(texture.len(), 22_050 * 5);
        assert!(texture.peak() <= 0.81);
        Ok(())
    }

    #[test]
    fn stereo_texture_is_downmixed_and_resampled() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("stereo.wav");

        let spec = WavSpec {
            channels: 2,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec)?;
        for i in 0..22_050 {
            let s = ((i as f32 * 0.05).sin() * 0.4 * f32::from(i16::MAX)) as i16;
            writer.write_sample(s)?;
            writer.write_sample(s)?;
        }
        writer.finalize()?;

        let texture = load_dust_texture(&path, 44_100)?;
        assert_eq!(texture.sample_rate(), 44_100);
        assert_eq!(texture.len(), 44_100);
        Ok(())
    }
}
