use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The requested effect name is not one of the defined presets. Raised
    /// at the string boundary, before any processing runs.
    #[error("unknown effect '{0}' (expected 'radio' or 'walkie')")]
    UnknownEffect(String),

    /// A stage received a parameter outside its valid domain. The whole
    /// pipeline run is abandoned; no partial buffer is returned.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The optional background texture could not be found. Callers treat
    /// this as non-fatal and run the pipeline without the mix stage.
    #[error("background texture unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("malformed parameter map: {0}")]
    ParameterMap(#[from] serde_json::Error),

    #[error("wav read/write failed: {0}")]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("resampler setup failed: {0}")]
    ResamplerConstruction(#[from] rubato::ResamplerConstructionError),

    #[error("resampling failed: {0}")]
    Resample(#[from] rubato::ResampleError),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
