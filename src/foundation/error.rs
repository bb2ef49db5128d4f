/// Convenience result type used across newsreel.
pub type NewsreelResult<T> = Result<T, NewsreelError>;

/// Top-level error taxonomy.
///
/// Every variant is fatal for a run: the pipeline aborts before the encoder is invoked (or, for
/// [`NewsreelError::Encode`], before the output file is moved into place).
#[derive(thiserror::Error, Debug)]
pub enum NewsreelError {
    /// Font metrics or text sizes that cannot produce a layout.
    #[error("layout error: {0}")]
    Layout(String),

    /// Speech synthesis failed or reported an unusable duration.
    #[error("narration error: {0}")]
    Narration(String),

    /// Script segments, narration results and frames could not be aligned.
    #[error("timeline error: {0}")]
    Timeline(String),

    /// Audio track length drifted from the video timeline beyond tolerance.
    #[error("sync error: {0}")]
    Sync(String),

    /// The external encoder failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Invalid configuration, theme or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NewsreelError {
    /// Build a [`NewsreelError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`NewsreelError::Narration`] value.
    pub fn narration(msg: impl Into<String>) -> Self {
        Self::Narration(msg.into())
    }

    /// Build a [`NewsreelError::Timeline`] value.
    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    /// Build a [`NewsreelError::Sync`] value.
    pub fn sync(msg: impl Into<String>) -> Self {
        Self::Sync(msg.into())
    }

    /// Build a [`NewsreelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`NewsreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
