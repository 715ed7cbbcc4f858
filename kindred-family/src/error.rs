//! Error types for the classification pass.

/// Error raised while deriving age classes.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// An age value that is not a well-formed integer.
    ///
    /// Aborts the whole classification pass; no later rule or subject is
    /// evaluated once this is raised.
    #[error("age value {value} on {subject} is not an integer")]
    NotAnInteger { subject: String, value: String },
}
