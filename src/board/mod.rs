//! Board ordering
//!
//! Everything needed to turn a drag-and-drop into one new `board_position`:
//! - column: sorted snapshot of one status column
//! - moves: the column as it would look after the drop
//! - position: neighbor lookup and the fractional key itself
//! - drop: the drag-end entry point

mod column;
mod drop;
mod moves;
mod position;

pub use column::sorted_column;
pub(crate) use column::compare_positions;
pub use drop::{after_drop_neighbors, calculate_issue_board_position, DraggableLocation, DropResult};
pub use moves::{insert_into, move_within};
pub use position::{
    calculate_position, neighbors, position_between, renormalize, Neighbors, FIRST_POSITION, POSITION_STEP,
};

/// Contract violations raised while computing a drop.
///
/// Any of these means the caller passed something the board never
/// produces; no position is returned and nothing may be persisted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoardError {
    #[error("dropped issue {0} not found")]
    IssueNotFound(String),
    #[error("issue {0} is not in the source column")]
    IssueNotInColumn(String),
    #[error("drop index {index} out of range for a column of {len} issues")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("issue {0} is not at its drop index after the move")]
    InconsistentDrop(String),
    #[error("no room for a position between {prev:?} and {next:?}")]
    NoRoomBetween { prev: Option<f64>, next: Option<f64> },
    #[error("invalid board position {0}")]
    InvalidPosition(f64),
}
