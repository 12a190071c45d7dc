//! Issue Helpers
//!
//! Small predicates and counters shared by the board, the backlog and
//! the column headers.

use serde::{Deserialize, Serialize};

use crate::domain::{Issue, IssueStatus, IssueType};

/// Literal sprint id the UI uses for the backlog list
pub const BACKLOG_ID: &str = "backlog";

/// Issue totals per column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct IssueCount {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl IssueCount {
    pub fn get(&self, status: IssueStatus) -> usize {
        match status {
            IssueStatus::Todo => self.todo,
            IssueStatus::InProgress => self.in_progress,
            IssueStatus::Done => self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.done
    }
}

pub fn issue_count_by_status<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> IssueCount {
    issues.into_iter().fold(IssueCount::default(), |mut acc, issue| {
        match issue.status {
            IssueStatus::Todo => acc.todo += 1,
            IssueStatus::InProgress => acc.in_progress += 1,
            IssueStatus::Done => acc.done += 1,
        }
        acc
    })
}

pub fn is_epic(issue: &Issue) -> bool {
    issue.issue_type == IssueType::Epic
}

pub fn is_subtask(issue: Option<&Issue>) -> bool {
    issue.map_or(false, |issue| issue.issue_type == IssueType::Subtask)
}

pub fn is_done(issue: &Issue) -> bool {
    issue.status == IssueStatus::Done
}

/// Map a sprint selector to a sprint id; the backlog has none
pub fn sprint_id(id: Option<&str>) -> Option<&str> {
    id.filter(|id| *id != BACKLOG_ID)
}

/// Sprint position that appends after every issue in `issues`
pub fn calculate_insert_position(issues: &[Issue]) -> f64 {
    issues.iter().map(|issue| issue.sprint_position).fold(0.0, f64::max) + 1.0
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

pub fn capitalize_many(s: &str) -> String {
    s.split(' ').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// "s" for more than one element, for labels like "3 issues"
pub fn plural_suffix<T>(items: &[T]) -> &'static str {
    if items.len() > 1 { "s" } else { "" }
}
