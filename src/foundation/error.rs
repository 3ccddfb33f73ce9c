/// Convenience result type used across tileveil.
pub type VeilResult<T> = Result<T, VeilError>;

/// Top-level error taxonomy used by the reveal engine.
#[derive(thiserror::Error, Debug)]
pub enum VeilError {
    /// Invalid user-provided configuration or viewport data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A tile key or coordinate that violates the coordinate model.
    #[error("coordinate error: {0}")]
    Coord(String),

    /// Errors raised by a render adapter or frame sink.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VeilError {
    /// Build a [`VeilError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VeilError::Coord`] value.
    pub fn coord(msg: impl Into<String>) -> Self {
        Self::Coord(msg.into())
    }

    /// Build a [`VeilError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`VeilError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
