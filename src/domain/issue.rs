//! Issue Entity
//!
//! An issue lives in exactly one board column (its status) and is ordered
//! inside that column by a fractional `board_position`.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// Board column an issue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl IssueStatus {
    /// Columns in the order the board renders them
    pub const ALL: [IssueStatus; 3] = [IssueStatus::Todo, IssueStatus::InProgress, IssueStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Todo => "TODO",
            IssueStatus::InProgress => "IN_PROGRESS",
            IssueStatus::Done => "DONE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "TODO" => Some(IssueStatus::Todo),
            "IN_PROGRESS" => Some(IssueStatus::InProgress),
            "DONE" => Some(IssueStatus::Done),
            _ => None,
        }
    }

    /// Column header text, e.g. "In Progress"
    pub fn label(&self) -> String {
        crate::helpers::capitalize_many(&self.as_str().replace('_', " "))
    }
}

/// Kind of work an issue represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Epic,
    Story,
    #[default]
    Task,
    Bug,
    Subtask,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Epic => "EPIC",
            IssueType::Story => "STORY",
            IssueType::Task => "TASK",
            IssueType::Bug => "BUG",
            IssueType::Subtask => "SUBTASK",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "EPIC" => Some(IssueType::Epic),
            "STORY" => Some(IssueType::Story),
            "TASK" => Some(IssueType::Task),
            "BUG" => Some(IssueType::Bug),
            "SUBTASK" => Some(IssueType::Subtask),
            _ => None,
        }
    }
}

/// A tracked issue, as the board sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Unique identifier, never changes
    pub id: String,
    /// Human-facing key, e.g. "BRD-12"
    pub key: String,
    pub name: String,
    pub status: IssueStatus,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub project_id: String,
    /// Ordering key inside the status column
    pub board_position: f64,
    /// Ordering key inside a sprint or the backlog
    #[serde(default)]
    pub sprint_position: f64,
    #[serde(default)]
    pub assignee_id: Option<String>,
    /// Epic (or parent story for subtasks)
    #[serde(default)]
    pub parent_id: Option<String>,
    /// None = backlog
    #[serde(default)]
    pub sprint_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl Issue {
    /// Create a new issue in the TODO column
    pub fn new(id: impl Into<String>, key: impl Into<String>, name: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            name: name.into(),
            status: IssueStatus::Todo,
            issue_type: IssueType::Task,
            project_id: project_id.into(),
            board_position: 0.0,
            sprint_position: 0.0,
            assignee_id: None,
            parent_id: None,
            sprint_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_position(mut self, board_position: f64) -> Self {
        self.board_position = board_position;
        self
    }

    pub fn with_type(mut self, issue_type: IssueType) -> Self {
        self.issue_type = issue_type;
        self
    }

    pub fn is_in_backlog(&self) -> bool {
        self.sprint_id.is_none()
    }
}

impl Entity for Issue {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

/// The single-issue write a board move produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueUpdate {
    pub id: String,
    pub status: IssueStatus,
    pub board_position: f64,
}
