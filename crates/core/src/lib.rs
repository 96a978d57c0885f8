pub mod config;
pub mod domain;
pub mod errors;

pub use domain::project::{Project, ProjectDraft, ProjectId};
pub use errors::{ApplicationError, DomainError};
