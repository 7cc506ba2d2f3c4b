// The two preset effect chains and the `transform` entry point. A preset
// is a fixed, ordered composition of the stages in `fx`; the only dynamic
// dispatch in the crate is picking the preset. Parameters are typed per
// preset, defaulted from the tables below, and validated in full before
// the first stage runs, so a bad value never leaves a half-processed
// buffer behind.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};
use crate::fx::{background, degrade, distortion, dynamics, filter, noise, transient};

/// Compressor knee, linear. Fixed by the walkie preset, not caller-tunable.
const COMPRESSOR_THRESHOLD: f32 = 0.3;
/// Static-bed envelope rate for the walkie preset.
const STATIC_FREQ_HZ: f32 = 0.3;

#[derive(ValueEnum, Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Aged broadcast receiver: narrow band, light clipping, hiss, low-rate
    /// smear and an optional dust bed.
    Radio,
    /// Handheld transceiver: telephone band, heavy compression, bit
    /// crushing, PTT clicks and intermittent static.
    Walkie,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radio => write!(f, "radio"),
            Self::Walkie => write!(f, "walkie"),
        }
    }
}

impl FromStr for Effect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "radio" => Ok(Self::Radio),
            "walkie" => Ok(Self::Walkie),
            other => Err(Error::UnknownEffect(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioParams {
    /// Band-pass low edge, Hz.
    pub low_cutoff: f32,
    /// Band-pass high edge, Hz.
    pub high_cutoff: f32,
    /// Clip gain multiplier.
    pub distortion_amount: f32,
    /// Additive hiss scale, relative to the signal's deviation.
    pub noise_factor: f32,
    /// Degraded intermediate rate, Hz. Skipped when not below the source.
    pub sample_rate: u32,
    /// Dust-bed mix level.
    pub dust_level: f32,
    /// Whether to mix the dust texture at all.
    pub use_dust_effect: bool,
}

impl Default for RadioParams {
    fn default() -> Self {
        Self {
            low_cutoff: 300.0,
            high_cutoff: 3000.0,
            distortion_amount: 1.2,
            noise_factor: 0.008,
            sample_rate: 8000,
            dust_level: 0.2,
            use_dust_effect: true,
        }
    }
}

impl RadioParams {
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        let nyquist = sample_rate as f32 / 2.0;
        filter::validate_cutoff("low_cutoff", self.low_cutoff, nyquist)?;
        filter::validate_cutoff("high_cutoff", self.high_cutoff, nyquist)?;
        if self.low_cutoff >= self.high_cutoff {
            return Err(Error::invalid(
                "low_cutoff",
                format!(
                    "{} Hz must be below high_cutoff ({} Hz)",
                    self.low_cutoff, self.high_cutoff
                ),
            ));
        }
        if !self.distortion_amount.is_finite() || self.distortion_amount <= 0.0 {
            return Err(Error::invalid("distortion_amount", "must be positive"));
        }
        if !self.noise_factor.is_finite() || self.noise_factor < 0.0 {
            return Err(Error::invalid("noise_factor", "must be non-negative"));
        }
        if self.sample_rate == 0 {
            return Err(Error::invalid("sample_rate", "must be positive"));
        }
        if !self.dust_level.is_finite() || self.dust_level < 0.0 {
            return Err(Error::invalid("dust_level", "must be non-negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkieParams {
    /// High-pass cutoff, Hz.
    pub low_cutoff: f32,
    /// Low-pass cutoff, Hz.
    pub high_cutoff: f32,
    /// Clip gain multiplier.
    pub distortion_amount: f32,
    /// Additive hiss scale, relative to the signal's deviation.
    pub noise_factor: f32,
    /// Static-bed amplitude.
    pub static_level: f32,
    /// Compressor ratio N:1.
    pub compression_ratio: f32,
    /// Compressor attack, milliseconds.
    pub attack_ms: f32,
    /// Compressor release, milliseconds.
    pub release_ms: f32,
    /// Quantization depth in bits.
    pub bit_depth: u32,
}

impl Default for WalkieParams {
    fn default() -> Self {
        Self {
            low_cutoff: 300.0,
            high_cutoff: 4000.0,
            distortion_amount: 1.05,
            noise_factor: 0.01,
            static_level: 0.03,
            compression_ratio: 8.0,
            attack_ms: 5.0,
            release_ms: 150.0,
            bit_depth: 8,
        }
    }
}

impl WalkieParams {
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        let nyquist = sample_rate as f32 / 2.0;
        filter::validate_cutoff("low_cutoff", self.low_cutoff, nyquist)?;
        filter::validate_cutoff("high_cutoff", self.high_cutoff, nyquist)?;
        if !self.distortion_amount.is_finite() || self.distortion_amount <= 0.0 {
            return Err(Error::invalid("distortion_amount", "must be positive"));
        }
        if !self.noise_factor.is_finite() || self.noise_factor < 0.0 {
            return Err(Error::invalid("noise_factor", "must be non-negative"));
        }
        if !self.static_level.is_finite() || self.static_level < 0.0 {
            return Err(Error::invalid("static_level", "must be non-negative"));
        }
        if !self.compression_ratio.is_finite() || self.compression_ratio < 1.0 {
            return Err(Error::invalid("compression_ratio", "must be at least 1"));
        }
        if !self.attack_ms.is_finite() || self.attack_ms <= 0.0 {
            return Err(Error::invalid("attack_ms", "must be positive"));
        }
        if !self.release_ms.is_finite() || self.release_ms <= 0.0 {
            return Err(Error::invalid("release_ms", "must be positive"));
        }
        if self.bit_depth == 0 || self.bit_depth > 24 {
            return Err(Error::invalid("bit_depth", "must be in 1..=24"));
        }
        Ok(())
    }
}

/// Resolved parameters for one transformation; the variant selects the
/// preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "lowercase")]
pub enum EffectParams {
    Radio(RadioParams),
    Walkie(WalkieParams),
}

impl EffectParams {
    pub fn defaults(effect: Effect) -> Self {
        match effect {
            Effect::Radio => Self::Radio(RadioParams::default()),
            Effect::Walkie => Self::Walkie(WalkieParams::default()),
        }
    }

    pub const fn effect(&self) -> Effect {
        match self {
            Self::Radio(_) => Effect::Radio,
            Self::Walkie(_) => Effect::Walkie,
        }
    }
}

/// Materializes preset parameters from a sparse name/value map. Unknown
/// names are ignored; missing names fall back to the preset defaults.
pub fn params_from_value(effect: Effect, overrides: serde_json::Value) -> Result<EffectParams> {
    Ok(match effect {
        Effect::Radio => EffectParams::Radio(serde_json::from_value(overrides)?),
        Effect::Walkie => EffectParams::Walkie(serde_json::from_value(overrides)?),
    })
}

/// Runs one buffer through the selected preset. `background` is the
/// optional, already-loaded dust texture (see [`crate::resource`]); the
/// radio preset degrades gracefully without it. Every stochastic stage
/// draws from `rng`, so a fixed seed gives bit-identical output.
pub fn transform<R: Rng>(
    input: &AudioBuffer,
    params: &EffectParams,
    background: Option<&AudioBuffer>,
    rng: &mut R,
) -> Result<AudioBuffer> {
    match params {
        EffectParams::Radio(p) => radio(input, p, background, rng),
        EffectParams::Walkie(p) => walkie(input, p, rng),
    }
}

/// Aged-radio chain: band-pass, light clipping, hiss, low-rate smear, dust.
pub fn radio<R: Rng>(
    input: &AudioBuffer,
    params: &RadioParams,
    background: Option<&AudioBuffer>,
    rng: &mut R,
) -> Result<AudioBuffer> {
    params.validate(input.sample_rate())?;
    debug!("radio chain on {} samples: {params:?}", input.len());

    let mut out = filter::bandpass(input, params.low_cutoff, params.high_cutoff)?;
    distortion::distort(&mut out, params.distortion_amount)?;
    noise::add_noise(&mut out, params.noise_factor, rng)?;
    if params.sample_rate < input.sample_rate() {
        out = degrade::reduce_sample_rate(&out, params.sample_rate)?;
    }
    if params.use_dust_effect {
        match background {
            Some(dust) => background::mix_background(&mut out, dust, params.dust_level)?,
            None => warn!("dust texture not provided, skipping background mix"),
        }
    }
    Ok(out)
}

/// Walkie-talkie chain: telephone band, compression, clipping, bit crush,
/// PTT clicks, hiss and static.
pub fn walkie<R: Rng>(
    input: &AudioBuffer,
    params: &WalkieParams,
    rng: &mut R,
) -> Result<AudioBuffer> {
    params.validate(input.sample_rate())?;
    debug!("walkie chain on {} samples: {params:?}", input.len());

    let mut out = filter::highpass(input, params.low_cutoff)?;
    out = filter::lowpass(&out, params.high_cutoff)?;
    dynamics::compress(
        &mut out,
        COMPRESSOR_THRESHOLD,
        params.compression_ratio,
        params.attack_ms,
        params.release_ms,
    )?;
    distortion::distort(&mut out, params.distortion_amount)?;
    distortion::bitcrush(&mut out, params.bit_depth)?;
    out = transient::add_ptt_clicks(&out, rng)?;
    noise::add_noise(&mut out, params.noise_factor, rng)?;
    noise::add_static(&mut out, params.static_level, STATIC_FREQ_HZ, rng)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use serde_json::json;

    #[test]
    fn effect_names_round_trip() {
        assert_eq!("radio".parse::<Effect>().unwrap(), Effect::Radio);
        assert_eq!("walkie".parse::<Effect>().unwrap(), Effect::Walkie);
        assert_eq!(Effect::Radio.to_string(), "radio");
        assert_eq!(Effect::Walkie.to_string(), "walkie");
    }

    #[test]
    fn unknown_effect_name_is_rejected() {
        let err = "fm".parse::<Effect>().unwrap_err();
        assert!(matches!(err, Error::UnknownEffect(name) if name == "fm"));
    }

    #[test]
    fn default_tables_match_the_presets() {
        let radio = RadioParams::default();
        assert_eq!(radio.low_cutoff, 300.0);
        assert_eq!(radio.high_cutoff, 3000.0);
        assert_eq!(radio.distortion_amount, 1.2);
        assert_eq!(radio.noise_factor, 0.008);
        assert_eq!(radio.sample_rate, 8000);
        assert_eq!(radio.dust_level, 0.2);
        assert!(radio.use_dust_effect);

        let walkie = WalkieParams::default();
        assert_eq!(walkie.low_cutoff, 300.0);
        assert_eq!(walkie.high_cutoff, 4000.0);
        assert_eq!(walkie.distortion_amount, 1.05);
        assert_eq!(walkie.noise_factor, 0.01);
        assert_eq!(walkie.static_level, 0.03);
        assert_eq!(walkie.compression_ratio, 8.0);
        assert_eq!(walkie.attack_ms, 5.0);
        assert_eq!(walkie.release_ms, 150.0);
        assert_eq!(walkie.bit_depth, 8);
    }

    #[test]
    fn sparse_overrides_merge_onto_defaults() {
        let params = params_from_value(
            Effect::Radio,
            json!({ "dust_level": 0.5, "use_dust_effect": false, "wow_flutter": 9 }),
        )
        .unwrap();
        let EffectParams::Radio(p) = params else {
            panic!("wrong variant");
        };
        // Overridden fields applied, unknown names ignored, the rest default.
        assert_eq!(p.dust_level, 0.5);
        assert!(!p.use_dust_effect);
        assert_eq!(p.low_cutoff, 300.0);
        assert_eq!(p.sample_rate, 8000);
    }

    #[test]
    fn validation_runs_before_any_stage() {
        // high_cutoff at or past Nyquist must fail the whole invocation.
        let buf = AudioBuffer::new(vec![0.1; 2048], 22_050);
        let params = EffectParams::Radio(RadioParams {
            low_cutoff: 20_000.0,
            high_cutoff: 21_000.0,
            ..RadioParams::default()
        });
        let mut rng = Pcg32::seed_from_u64(0);
        let err = transform(&buf, &params, None, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn radio_without_texture_degrades_gracefully() {
        let buf = AudioBuffer::new(
            (0..8192).map(|i| ((i as f32) * 0.06).sin() * 0.5).collect(),
            44_100,
        );
        let params = EffectParams::defaults(Effect::Radio);
        let mut rng = Pcg32::seed_from_u64(21);
        // use_dust_effect is on by default but no texture is supplied.
        let out = transform(&buf, &params, None, &mut rng).unwrap();
        assert_eq!(out.len(), buf.len());
    }

    #[test]
    fn effect_accessor_matches_variant() {
        assert_eq!(EffectParams::defaults(Effect::Radio).effect(), Effect::Radio);
        assert_eq!(
            EffectParams::defaults(Effect::Walkie).effect(),
            Effect::Walkie
        );
    }
}
