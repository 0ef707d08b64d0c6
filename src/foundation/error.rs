/// Convenience result type used across Strata.
pub type StrataResult<T> = Result<T, StrataError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Cancellation and the recursion depth limit are not errors; they are reported
/// through [`crate::RenderOutcome`].
#[derive(thiserror::Error, Debug)]
pub enum StrataError {
    /// Invalid user-provided canvas, layer or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while validating animated parameters.
    #[error("animation error: {0}")]
    Animation(String),

    /// Unrecoverable failure while rendering (bad descriptor, oversized surface).
    #[error("render error: {0}")]
    Render(String),

    /// Failure reported by a raster target.
    #[error("target error: {0}")]
    Target(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StrataError {
    /// Build a [`StrataError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StrataError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`StrataError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StrataError::Target`] value.
    pub fn target(msg: impl Into<String>) -> Self {
        Self::Target(msg.into())
    }

    /// Build a [`StrataError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for StrataError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
