//! Project domain entity

use serde::{Deserialize, Serialize};
use super::entity::{DomainError, DomainResult, Entity};

/// A project owns one board of issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Short name used as the issue key prefix
    pub key: String,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl Entity for Project {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            key: key.into(),
            created_at: None,
        }
    }

    /// Both the name and the short name are required
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("Project name must not be empty".to_string()));
        }
        if self.key.trim().is_empty() {
            return Err(DomainError::InvalidInput("Project short name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Issue key for the n-th issue of this project, e.g. "BRD-7"
    pub fn issue_key(&self, number: i64) -> String {
        format!("{}-{}", self.key, number)
    }
}
