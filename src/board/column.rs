//! Column snapshots
//!
//! A column is every issue with a given status, top to bottom.

use std::cmp::Ordering;

use crate::domain::{Issue, IssueStatus};

/// Issues of one column sorted ascending by board position.
///
/// The sort is stable: issues sharing a position keep their input order.
/// That is the fallback ordering when two keys collide, not something to
/// repair here. NaN positions are ordered with `f64::total_cmp` so they
/// cannot poison the sort.
pub fn sorted_column(issues: &[Issue], status: IssueStatus) -> Vec<&Issue> {
    let mut column: Vec<&Issue> = issues.iter().filter(|issue| issue.status == status).collect();
    column.sort_by(|a, b| compare_positions(a.board_position, b.board_position));
    column
}

pub(crate) fn compare_positions(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}
