//! Hypothetical moves
//!
//! Builds the destination column as it would look right after a drop,
//! without touching any stored issue.

use crate::domain::Issue;
use super::BoardError;

/// Relocate an issue inside its own column.
///
/// The result has the same length as `column`. `new_index` must address an
/// existing slot (`0..len`).
pub fn move_within<'a>(column: &[&'a Issue], issue_id: &str, new_index: usize) -> Result<Vec<&'a Issue>, BoardError> {
    let old_index = column
        .iter()
        .position(|issue| issue.id == issue_id)
        .ok_or_else(|| BoardError::IssueNotInColumn(issue_id.to_string()))?;

    if new_index >= column.len() {
        return Err(BoardError::IndexOutOfRange { index: new_index, len: column.len() });
    }

    let mut moved = column.to_vec();
    let issue = moved.remove(old_index);
    moved.insert(new_index, issue);
    Ok(moved)
}

/// Insert an issue coming from another column.
///
/// The result is one longer than `column`. `index == len` appends.
pub fn insert_into<'a>(column: &[&'a Issue], issue: &'a Issue, index: usize) -> Result<Vec<&'a Issue>, BoardError> {
    if index > column.len() {
        return Err(BoardError::IndexOutOfRange { index, len: column.len() });
    }

    let mut inserted = Vec::with_capacity(column.len() + 1);
    inserted.extend_from_slice(&column[..index]);
    inserted.push(issue);
    inserted.extend_from_slice(&column[index..]);
    Ok(inserted)
}
