use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use projector_core::domain::project::{Project, ProjectDraft, ProjectId};

use super::{ProjectRepository, RepositoryError};

/// Process-lifetime project store.
///
/// The sequence counter and the record map sit behind a single lock so that
/// id assignment and insertion happen in one critical section.
pub struct InMemoryProjectRepository {
    state: RwLock<ProjectStore>,
}

struct ProjectStore {
    next_sequence: u64,
    projects: HashMap<String, Project>,
    order: Vec<ProjectId>,
}

impl Default for InMemoryProjectRepository {
    fn default() -> Self {
        Self {
            state: RwLock::new(ProjectStore {
                next_sequence: 1,
                projects: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(&self, draft: ProjectDraft) -> Result<Project, RepositoryError> {
        let mut state = self.state.write().await;

        let sequence = state.next_sequence;
        let following = sequence.checked_add(1).ok_or(RepositoryError::SequenceExhausted)?;
        let id = ProjectId::from_sequence(sequence);
        if state.projects.contains_key(id.as_str()) {
            return Err(RepositoryError::Duplicate(id));
        }

        let project = Project::from_draft(id.clone(), draft, Utc::now());
        state.projects.insert(id.as_str().to_owned(), project.clone());
        state.order.push(id);
        // Only advanced once the record is in place.
        state.next_sequence = following;

        Ok(project)
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.projects.get(id.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.order.iter().filter_map(|id| state.projects.get(id.as_str()).cloned()).collect())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.projects.len())
    }
}
