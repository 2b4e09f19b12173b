use thiserror::Error;

/// Failures of the simulation engine. Functions return
/// `anyhow::Result`; use `downcast_ref::<SimError>()` to inspect.
#[derive(Debug, Error)]
pub enum SimError {
    /// A template experiment resolved to no usable samples
    #[error("experiment {experiment}: {reason}")]
    Selection { experiment: Box<str>, reason: String },

    /// Matrix shapes disagree with what the codec expects
    #[error("{what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Statistics over zero rows
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SimError {
    pub fn dimension(what: &'static str, expected: usize, found: usize) -> Self {
        SimError::DimensionMismatch {
            what,
            expected,
            found,
        }
    }
}
