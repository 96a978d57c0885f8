use async_trait::async_trait;
use thiserror::Error;

use projector_core::domain::project::{Project, ProjectDraft, ProjectId};

pub mod memory;

pub use memory::InMemoryProjectRepository;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("project sequence exhausted")]
    SequenceExhausted,
    #[error("project `{0}` already exists")]
    Duplicate(ProjectId),
}

/// Store for created projects. Ids are assigned here and nowhere else.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, draft: ProjectDraft) -> Result<Project, RepositoryError>;
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Project>, RepositoryError>;
    async fn count(&self) -> Result<usize, RepositoryError>;
}
