/// Convenience result type used across quizscene.
pub type QuizSceneResult<T> = Result<T, QuizSceneError>;

/// Top-level error taxonomy used by fallible library APIs.
///
/// Validation *findings* (schema errors, missing references) are reported as data through
/// [`crate::ValidationReport`]; this type covers the operations that cannot produce a result at
/// all.
#[derive(thiserror::Error, Debug)]
pub enum QuizSceneError {
    /// Invalid user-provided or generated document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Model output that does not contain a usable JSON document.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Failures reported by an external generation service.
    #[error("generation error: {0}")]
    Generation(String),

    /// Catalog loading or persistence failures.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuizSceneError {
    /// Build a [`QuizSceneError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QuizSceneError::Extraction`] value.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Build a [`QuizSceneError::Generation`] value.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Build a [`QuizSceneError::Catalog`] value.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Build a [`QuizSceneError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
