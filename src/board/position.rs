//! Fractional board positions
//!
//! A moved issue gets a key strictly between its new neighbors, so no
//! other issue in the column is ever rewritten by a move.

use crate::domain::Issue;
use super::BoardError;

/// Position used for the first issue dropped into an empty column
pub const FIRST_POSITION: f64 = 1.0;

/// Gap used when placing before the head or after the tail
pub const POSITION_STEP: f64 = 1.0;

/// Issues directly above and below a slot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Neighbors<'a> {
    pub prev: Option<&'a Issue>,
    pub next: Option<&'a Issue>,
}

impl Neighbors<'_> {
    pub fn is_empty(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}

/// Neighbors of the issue sitting at `index` in a post-drop list.
///
/// The issue at `index` itself is never its own neighbor.
pub fn neighbors<'a>(list: &[&'a Issue], index: usize) -> Neighbors<'a> {
    Neighbors {
        prev: index.checked_sub(1).and_then(|i| list.get(i)).copied(),
        next: index.checked_add(1).and_then(|i| list.get(i)).copied(),
    }
}

/// New key for an issue placed between `prev` and `next`.
///
/// | prev | next | result |
/// |------|------|--------|
/// | none | none | 1 |
/// | none | n    | n - 1 |
/// | p    | none | p + 1 |
/// | p    | n    | midpoint |
///
/// The result is strictly greater than `prev` and strictly less than
/// `next`. When `f64` cannot represent such a value (equal or inverted
/// neighbors, or adjacent floats) this returns `NoRoomBetween` instead of
/// a key that would break the column order.
pub fn position_between(prev: Option<f64>, next: Option<f64>) -> Result<f64, BoardError> {
    for bound in [prev, next].into_iter().flatten() {
        if !bound.is_finite() {
            return Err(BoardError::InvalidPosition(bound));
        }
    }

    let position = match (prev, next) {
        (None, None) => FIRST_POSITION,
        (None, Some(next)) => next - POSITION_STEP,
        (Some(prev), None) => prev + POSITION_STEP,
        (Some(prev), Some(next)) => prev + (next - prev) / 2.0,
    };

    let above = prev.map_or(true, |prev| position > prev);
    let below = next.map_or(true, |next| position < next);
    if !position.is_finite() || !above || !below {
        return Err(BoardError::NoRoomBetween { prev, next });
    }

    Ok(position)
}

/// Position for a slot given its neighbors
pub fn calculate_position(neighbors: &Neighbors<'_>) -> Result<f64, BoardError> {
    position_between(
        neighbors.prev.map(|issue| issue.board_position),
        neighbors.next.map(|issue| issue.board_position),
    )
}

/// Fresh evenly spaced keys `1, 2, 3, ...` for a column in its current order.
///
/// Moves never call this; it is the explicit escape hatch once
/// `position_between` reports `NoRoomBetween`. Every returned pair is a
/// separate write to the issue store.
pub fn renormalize(column: &[&Issue]) -> Vec<(String, f64)> {
    column
        .iter()
        .enumerate()
        .map(|(i, issue)| (issue.id.clone(), FIRST_POSITION + i as f64 * POSITION_STEP))
        .collect()
}
