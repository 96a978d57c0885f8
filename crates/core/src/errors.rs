use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("project name is required")]
    MissingProjectName,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl ApplicationError {
    /// Text that is safe to hand back to the platform or an operator.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::MissingProjectName) => "Project name is required.",
            Self::Persistence(_) => "The service is temporarily unavailable. Please retry shortly.",
        }
    }
}
