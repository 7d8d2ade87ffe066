use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RingError {
    #[error("Invalid ring configuration: {0}")]
    InvalidConfiguration(String),
}

impl RingError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}
