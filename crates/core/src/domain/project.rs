use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::DomainError;

pub const PROJECT_ID_PREFIX: &str = "PRJ";
const PROJECT_ID_WIDTH: usize = 3;

/// Only minted from a sequence number; the repository owns the sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectId(String);

impl ProjectId {
    /// Sequences wider than the pad width keep all their digits (`PRJ-1000`).
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("{PROJECT_ID_PREFIX}-{sequence:0width$}", width = PROJECT_ID_WIDTH))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated input for a project that has not been assigned an id yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectDraft {
    name: String,
    description: String,
    created_by: String,
}

impl ProjectDraft {
    pub fn new(
        name: &str,
        description: &str,
        created_by: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::MissingProjectName);
        }

        Ok(Self {
            name: name.to_owned(),
            description: description.trim().to_owned(),
            created_by: created_by.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn from_draft(id: ProjectId, draft: ProjectDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            created_by: draft.created_by,
            created_at,
        }
    }

    pub fn description(&self) -> Option<&str> {
        (!self.description.is_empty()).then_some(self.description.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{Project, ProjectDraft, ProjectId};
    use crate::errors::DomainError;

    #[test]
    fn project_ids_are_zero_padded_to_three_digits() {
        assert_eq!(ProjectId::from_sequence(1).as_str(), "PRJ-001");
        assert_eq!(ProjectId::from_sequence(42).as_str(), "PRJ-042");
        assert_eq!(ProjectId::from_sequence(999).as_str(), "PRJ-999");
    }

    #[test]
    fn project_ids_keep_growing_past_the_pad_width() {
        assert_eq!(ProjectId::from_sequence(1000).to_string(), "PRJ-1000");
    }

    #[test]
    fn display_and_as_str_render_the_same_id() {
        let id = ProjectId::from_sequence(12);

        assert_eq!(id.to_string(), id.as_str());
        assert_eq!(format!("*{id}*"), "*PRJ-012*");
    }

    #[test]
    fn draft_trims_name_and_description() {
        let draft = ProjectDraft::new("  Stats MVP \n", "\t weekly numbers  ", "U123")
            .expect("draft should validate");

        assert_eq!(draft.name(), "Stats MVP");
        assert_eq!(draft.description(), "weekly numbers");
        assert_eq!(draft.created_by(), "U123");
    }

    #[test]
    fn draft_rejects_blank_names() {
        assert_eq!(ProjectDraft::new("", "desc", "U1"), Err(DomainError::MissingProjectName));
        assert_eq!(ProjectDraft::new("   \n\t", "", "U1"), Err(DomainError::MissingProjectName));
    }

    #[test]
    fn empty_description_is_reported_as_absent() {
        let draft = ProjectDraft::new("Stats MVP", "   ", "U1").expect("draft");
        let project = Project::from_draft(ProjectId::from_sequence(7), draft, Utc::now());

        assert_eq!(project.description, "");
        assert_eq!(project.description(), None);
        assert_eq!(project.id.as_str(), "PRJ-007");
    }
}
