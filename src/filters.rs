//! Issue Filters
//!
//! Which issues the board shows is a pure function of the issue list and
//! a `FilterConfig`. Every predicate answers "should this issue be
//! hidden?" and never hides anything when its own filter list is empty.

use serde::{Deserialize, Serialize};

use crate::board::compare_positions;
use crate::domain::{Issue, IssueStatus, IssueType};

/// Assignee filter value matching issues nobody owns
pub const UNASSIGNED: &str = "unassigned";

/// Active board filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    /// Free text matched against name, assignee and key
    pub search: String,
    pub assignees: Vec<String>,
    /// Epic ids; an issue passes if its parent is one of them
    pub epics: Vec<String>,
    pub issue_types: Vec<IssueType>,
    pub sprint_ids: Vec<String>,
    /// With sprint filters set, also hide backlog issues
    pub exclude_backlog: bool,
}

impl FilterConfig {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.assignees.is_empty()
            && self.epics.is_empty()
            && self.issue_types.is_empty()
            && self.sprint_ids.is_empty()
    }

    /// Whether the issue passes every filter
    pub fn matches(&self, issue: &Issue) -> bool {
        !(issue_not_in_search(issue, &self.search)
            || assignee_not_in_filters(issue, &self.assignees)
            || epic_not_in_filters(issue, &self.epics)
            || issue_type_not_in_filters(issue, &self.issue_types)
            || issue_sprint_not_in_filters(issue, &self.sprint_ids, self.exclude_backlog))
    }
}

pub fn issue_not_in_search(issue: &Issue, search: &str) -> bool {
    if search.is_empty() {
        return false;
    }
    let needle = search.to_lowercase();
    let found = issue.name.to_lowercase().contains(&needle)
        || issue
            .assignee_id
            .as_deref()
            .map_or(false, |assignee| assignee.to_lowercase().contains(&needle))
        || issue.key.to_lowercase().contains(&needle);
    !found
}

pub fn assignee_not_in_filters(issue: &Issue, assignees: &[String]) -> bool {
    if assignees.is_empty() {
        return false;
    }
    let assignee = issue.assignee_id.as_deref().unwrap_or(UNASSIGNED);
    !assignees.iter().any(|a| a == assignee)
}

pub fn epic_not_in_filters(issue: &Issue, epics: &[String]) -> bool {
    if epics.is_empty() {
        return false;
    }
    match &issue.parent_id {
        Some(parent) => !epics.contains(parent),
        None => true,
    }
}

pub fn issue_type_not_in_filters(issue: &Issue, issue_types: &[IssueType]) -> bool {
    !issue_types.is_empty() && !issue_types.contains(&issue.issue_type)
}

pub fn issue_sprint_not_in_filters(issue: &Issue, sprint_ids: &[String], exclude_backlog: bool) -> bool {
    match &issue.sprint_id {
        None => !sprint_ids.is_empty() && exclude_backlog,
        Some(sprint) => !sprint_ids.is_empty() && !sprint_ids.contains(sprint),
    }
}

/// Issues passing `config`, in input order
pub fn filter_issues<'a>(issues: &'a [Issue], config: &FilterConfig) -> Vec<&'a Issue> {
    issues.iter().filter(|issue| config.matches(issue)).collect()
}

/// Visible issues of one column, top to bottom
pub fn column_issues<'a>(issues: &'a [Issue], status: IssueStatus, config: &FilterConfig) -> Vec<&'a Issue> {
    let mut column: Vec<&Issue> = issues
        .iter()
        .filter(|issue| issue.status == status && config.matches(issue))
        .collect();
    column.sort_by(|a, b| compare_positions(a.board_position, b.board_position));
    column
}
