use thiserror::Error;

/// Diagnostic error types covering configuration and collaborator failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiagError {
    /// Configuration or construction parameter error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A hardware collaborator reported failure (e.g. access point not started).
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// A duration cannot be represented by the clock's timestamp type.
    #[error("clock error: {0}")]
    Clock(String),
}

/// Convenience type alias for diagnostic operations.
pub type DiagResult<T> = Result<T, DiagError>;
