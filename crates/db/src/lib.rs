pub mod repositories;

pub use repositories::{InMemoryProjectRepository, ProjectRepository, RepositoryError};
