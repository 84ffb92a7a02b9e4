use super::repository::RepositoryError;
use super::validation::AdmissionError;

/// Error raised by the scheduling services.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error(transparent)]
    Admission(#[from] AdmissionError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SchedulingError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// A record that vanished between lookup and write is reported as `NotFound`.
    pub(crate) fn from_repository(
        entity: &'static str,
        id: impl ToString,
        error: RepositoryError,
    ) -> Self {
        match error {
            RepositoryError::NotFound => Self::not_found(entity, id),
            other => Self::Repository(other),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
