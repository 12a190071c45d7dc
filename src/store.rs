//! Board State Store
//!
//! Local copy of the issues a board shows, with optimistic moves.
//!
//! A move is two-phase: `begin_move` snapshots the list and applies the
//! change, then the caller either `commit`s once the issue store accepted
//! the update or `rollback`s to the snapshot. The snapshot is a plain
//! value owned by the caller through `PendingMove`.

use crate::domain::{DomainError, DomainResult, Issue, IssueStatus, IssueUpdate};
use crate::filters::{column_issues, FilterConfig};

/// Frozen copy of the issue list
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    issues: Vec<Issue>,
}

impl Snapshot {
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

/// A move applied locally but not yet confirmed
#[derive(Debug)]
#[must_use = "a pending move must be committed or rolled back"]
pub struct PendingMove {
    snapshot: Snapshot,
    update: IssueUpdate,
}

impl PendingMove {
    pub fn update(&self) -> &IssueUpdate {
        &self.update
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

/// Issues currently shown on the board
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    issues: Vec<Issue>,
}

impl BoardState {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn get(&self, id: &str) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.id == id)
    }

    /// Replace everything with fresh query results
    pub fn replace_all(&mut self, issues: Vec<Issue>) {
        self.issues = issues;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { issues: self.issues.clone() }
    }

    /// Visible issues of one column, top to bottom
    pub fn column(&self, status: IssueStatus, filter: &FilterConfig) -> Vec<&Issue> {
        column_issues(&self.issues, status, filter)
    }

    /// Snapshot, then apply `update` to the one issue it names.
    ///
    /// Leaves the state untouched if the issue is not on the board.
    pub fn begin_move(&mut self, update: IssueUpdate) -> DomainResult<PendingMove> {
        let snapshot = self.snapshot();
        let issue = self
            .issues
            .iter_mut()
            .find(|issue| issue.id == update.id)
            .ok_or_else(|| DomainError::NotFound(format!("Issue {} not on board", update.id)))?;

        issue.status = update.status;
        issue.board_position = update.board_position;

        Ok(PendingMove { snapshot, update })
    }

    /// The issue store accepted the move; forget the snapshot
    pub fn commit(&mut self, pending: PendingMove) -> IssueUpdate {
        pending.update
    }

    /// The issue store rejected the move; restore the exact pre-move list
    pub fn rollback(&mut self, pending: PendingMove) -> IssueUpdate {
        self.issues = pending.snapshot.issues;
        pending.update
    }

    /// Insert or replace an issue by ID
    pub fn upsert_issue(&mut self, issue: Issue) {
        match self.issues.iter_mut().find(|existing| existing.id == issue.id) {
            Some(existing) => *existing = issue,
            None => self.issues.push(issue),
        }
    }

    /// Remove an issue by ID
    pub fn remove_issue(&mut self, id: &str) {
        self.issues.retain(|issue| issue.id != id);
    }
}
