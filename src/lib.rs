// Voice character effects: renders a decoded mono buffer as an aged radio
// broadcast ("radio") or a handheld transceiver ("walkie").

// Enable pedantic lints globally, then allow the noisy ones we're not fixing.
#![warn(clippy::pedantic, clippy::nursery)]
// Not a public-API-polished crate, adding #[must_use] everywhere is noise
#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]
// DSP variable names (low_cutoff vs high_cutoff, etc.) are intentionally similar
#![allow(clippy::similar_names)]
// Audio code performs intentional casts
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::cast_possible_wrap
)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions, clippy::doc_markdown, clippy::float_cmp)]

pub mod buffer;
pub mod error;
pub mod fx;
pub mod pipeline;
pub mod resource;
pub mod rng;

pub use buffer::AudioBuffer;
pub use error::{Error, Result};
pub use pipeline::{Effect, EffectParams, RadioParams, WalkieParams, params_from_value, transform};
pub use rng::create_rng;
