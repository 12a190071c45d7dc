//! Drop handling
//!
//! Turns a finished drag into the new board position of the dropped issue.

use serde::{Deserialize, Serialize};

use crate::domain::{Issue, IssueStatus};
use super::column::sorted_column;
use super::moves::{insert_into, move_within};
use super::position::{calculate_position, neighbors, Neighbors};
use super::BoardError;

/// A slot on the board: which column, and how far down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraggableLocation {
    pub droppable_id: IssueStatus,
    pub index: usize,
}

impl DraggableLocation {
    pub fn new(droppable_id: IssueStatus, index: usize) -> Self {
        Self { droppable_id, index }
    }
}

/// What the drag surface reports when a drag ends.
///
/// `destination` is `None` when the card was released outside any column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropResult {
    pub draggable_id: String,
    pub source: DraggableLocation,
    pub destination: Option<DraggableLocation>,
}

/// Neighbors the dropped issue will have once the drop lands
pub fn after_drop_neighbors<'a>(
    active_issues: &'a [Issue],
    dropped_issue_id: &str,
    source: &DraggableLocation,
    destination: &DraggableLocation,
) -> Result<Neighbors<'a>, BoardError> {
    let dropped = active_issues
        .iter()
        .find(|issue| issue.id == dropped_issue_id)
        .ok_or_else(|| BoardError::IssueNotFound(dropped_issue_id.to_string()))?;
    if dropped.status != source.droppable_id {
        return Err(BoardError::IssueNotInColumn(dropped.id.clone()));
    }

    let before_drop = sorted_column(active_issues, destination.droppable_id);
    let after_drop = if source.droppable_id == destination.droppable_id {
        move_within(&before_drop, &dropped.id, destination.index)?
    } else {
        insert_into(&before_drop, dropped, destination.index)?
    };

    let around = match after_drop.get(destination.index) {
        Some(issue) if issue.id == dropped.id => neighbors(&after_drop, destination.index),
        _ => return Err(BoardError::InconsistentDrop(dropped.id.clone())),
    };
    // the dropped issue is never its own neighbor
    if [around.prev, around.next].into_iter().flatten().any(|issue| issue.id == dropped.id) {
        return Err(BoardError::InconsistentDrop(dropped.id.clone()));
    }
    Ok(around)
}

/// New board position for the dropped issue.
///
/// Pure: the same inputs always give the same position, and nothing in
/// `active_issues` is modified.
pub fn calculate_issue_board_position(
    active_issues: &[Issue],
    dropped_issue_id: &str,
    source: &DraggableLocation,
    destination: &DraggableLocation,
) -> Result<f64, BoardError> {
    let around = after_drop_neighbors(active_issues, dropped_issue_id, source, destination)?;
    let position = calculate_position(&around)?;
    log::debug!(
        "Issue {} dropped at {}[{}] between {:?} and {:?} -> {}",
        dropped_issue_id,
        destination.droppable_id.as_str(),
        destination.index,
        around.prev.map(|issue| issue.board_position),
        around.next.map(|issue| issue.board_position),
        position
    );
    Ok(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(id: &str, status: IssueStatus, position: f64) -> Issue {
        Issue::new(id, id, id, "p1").with_status(status).with_position(position)
    }

    fn todo_column() -> Vec<Issue> {
        vec![
            issue("B", IssueStatus::Todo, 2.0),
            issue("A", IssueStatus::Todo, 1.0),
            issue("C", IssueStatus::Todo, 3.0),
        ]
    }

    #[test]
    fn test_same_column_move_to_head() {
        let issues = todo_column();
        let source = DraggableLocation::new(IssueStatus::Todo, 2);
        let destination = DraggableLocation::new(IssueStatus::Todo, 0);

        let around = after_drop_neighbors(&issues, "C", &source, &destination).unwrap();
        assert!(around.prev.is_none());
        assert_eq!(around.next.map(|i| i.id.as_str()), Some("A"));
        assert_eq!(calculate_issue_board_position(&issues, "C", &source, &destination).unwrap(), 0.0);
    }

    #[test]
    fn test_same_column_move_down() {
        let issues = todo_column();
        let source = DraggableLocation::new(IssueStatus::Todo, 0);

        // A to the middle: B(2) A C(3)
        let middle = DraggableLocation::new(IssueStatus::Todo, 1);
        assert_eq!(calculate_issue_board_position(&issues, "A", &source, &middle).unwrap(), 2.5);

        // A to the bottom: B C(3) A
        let bottom = DraggableLocation::new(IssueStatus::Todo, 2);
        assert_eq!(calculate_issue_board_position(&issues, "A", &source, &bottom).unwrap(), 4.0);
    }

    #[test]
    fn test_cross_column_move_lands_between() {
        let issues = vec![
            issue("A", IssueStatus::Done, 1.0),
            issue("B", IssueStatus::Done, 3.0),
            issue("X", IssueStatus::Todo, 7.0),
        ];
        let source = DraggableLocation::new(IssueStatus::Todo, 0);
        let destination = DraggableLocation::new(IssueStatus::Done, 1);

        let around = after_drop_neighbors(&issues, "X", &source, &destination).unwrap();
        assert_eq!(around.prev.map(|i| i.id.as_str()), Some("A"));
        assert_eq!(around.next.map(|i| i.id.as_str()), Some("B"));
        assert_eq!(calculate_issue_board_position(&issues, "X", &source, &destination).unwrap(), 2.0);
    }

    #[test]
    fn test_cross_column_into_empty_and_tail() {
        let issues = vec![issue("A", IssueStatus::Done, 5.0), issue("X", IssueStatus::Todo, 1.0)];
        let source = DraggableLocation::new(IssueStatus::Todo, 0);

        let empty = DraggableLocation::new(IssueStatus::InProgress, 0);
        assert_eq!(calculate_issue_board_position(&issues, "X", &source, &empty).unwrap(), 1.0);

        let tail = DraggableLocation::new(IssueStatus::Done, 1);
        assert_eq!(calculate_issue_board_position(&issues, "X", &source, &tail).unwrap(), 6.0);
    }

    #[test]
    fn test_single_issue_column_reorders_to_one() {
        let issues = vec![issue("A", IssueStatus::Todo, 42.0)];
        let here = DraggableLocation::new(IssueStatus::Todo, 0);
        assert_eq!(calculate_issue_board_position(&issues, "A", &here, &here).unwrap(), 1.0);
    }

    #[test]
    fn test_same_inputs_same_position() {
        let issues = todo_column();
        let snapshot = issues.clone();
        let source = DraggableLocation::new(IssueStatus::Todo, 0);
        let destination = DraggableLocation::new(IssueStatus::Todo, 2);

        let first = calculate_issue_board_position(&issues, "A", &source, &destination).unwrap();
        let second = calculate_issue_board_position(&issues, "A", &source, &destination).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(issues, snapshot);
    }

    #[test]
    fn test_contract_violations() {
        let issues = todo_column();
        let source = DraggableLocation::new(IssueStatus::Todo, 0);

        let destination = DraggableLocation::new(IssueStatus::Todo, 0);
        assert_eq!(
            calculate_issue_board_position(&issues, "nope", &source, &destination).unwrap_err(),
            BoardError::IssueNotFound("nope".to_string())
        );

        let too_far = DraggableLocation::new(IssueStatus::Todo, 3);
        assert_eq!(
            calculate_issue_board_position(&issues, "A", &source, &too_far).unwrap_err(),
            BoardError::IndexOutOfRange { index: 3, len: 3 }
        );

        let other_column = DraggableLocation::new(IssueStatus::Done, 1);
        assert_eq!(
            calculate_issue_board_position(&issues, "A", &source, &other_column).unwrap_err(),
            BoardError::IndexOutOfRange { index: 1, len: 0 }
        );

        // Source claims DONE but the issue sits in TODO
        let done = DraggableLocation::new(IssueStatus::Done, 0);
        assert_eq!(
            calculate_issue_board_position(&issues, "A", &done, &done).unwrap_err(),
            BoardError::IssueNotInColumn("A".to_string())
        );
    }

    #[test]
    fn test_wrong_source_column_is_rejected() {
        let issues = vec![
            issue("A", IssueStatus::Done, 1.0),
            issue("X", IssueStatus::Done, 2.0),
            issue("B", IssueStatus::Done, 3.0),
        ];
        let claimed_source = DraggableLocation::new(IssueStatus::Todo, 0);
        let destination = DraggableLocation::new(IssueStatus::Done, 2);

        assert_eq!(
            after_drop_neighbors(&issues, "X", &claimed_source, &destination).unwrap_err(),
            BoardError::IssueNotInColumn("X".to_string())
        );
        assert_eq!(
            calculate_issue_board_position(&issues, "X", &claimed_source, &destination).unwrap_err(),
            BoardError::IssueNotInColumn("X".to_string())
        );
    }

    #[test]
    fn test_duplicate_id_in_destination_is_inconsistent() {
        let issues = vec![issue("X", IssueStatus::Todo, 1.0), issue("X", IssueStatus::Done, 2.0)];
        let source = DraggableLocation::new(IssueStatus::Todo, 0);
        let destination = DraggableLocation::new(IssueStatus::Done, 0);

        assert_eq!(
            calculate_issue_board_position(&issues, "X", &source, &destination).unwrap_err(),
            BoardError::InconsistentDrop("X".to_string())
        );
    }
}
