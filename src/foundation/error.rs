/// Result alias used throughout the crate.
pub type FlowlensResult<T> = Result<T, FlowlensError>;

/// Error type for composition, mapping, and heatmap rendering.
#[derive(thiserror::Error, Debug)]
pub enum FlowlensError {
    /// Invalid input or settings rejected before any work is done.
    #[error("validation error: {0}")]
    Validation(String),

    /// Layout metadata that does not describe the slide list it is paired with.
    #[error("layout error: {0}")]
    Layout(String),

    /// Failure while producing pixels.
    #[error("render error: {0}")]
    Render(String),

    /// JSON that could not be read or written.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level failure (decode, I/O) with its context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlowlensError {
    /// Build a [`FlowlensError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlowlensError::Layout`].
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`FlowlensError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

impl From<serde_json::Error> for FlowlensError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
