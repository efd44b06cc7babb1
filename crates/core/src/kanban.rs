//! Kanban board ordering.
//!
//! Each (project, status) pair is a column whose tasks carry an `order`
//! value. The board is healthy when every column's orders are exactly
//! `0..n-1`. A move closes the gap left in the source column, opens a slot
//! in the destination column, then drops the task into the slot.
//!
//! [`ReorderPlan`] decides the effective source and destination; the
//! repository executes it as three UPDATEs inside one transaction.
//! [`ReorderPlan::apply`] is the same algorithm over an in-memory board.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::status::TaskStatus;
use crate::types::DbId;

/// A slot on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ColumnPosition {
    pub status: TaskStatus,
    #[validate(range(min = 0, message = "index must be zero or greater"))]
    pub index: i32,
}

impl ColumnPosition {
    pub fn new(status: TaskStatus, index: i32) -> Self {
        Self { status, index }
    }
}

/// A resolved move of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderPlan {
    pub source: ColumnPosition,
    pub destination: ColumnPosition,
}

impl ReorderPlan {
    /// Resolve a client-requested move.
    ///
    /// `current` is the task's stored position. `requested_from` must match it;
    /// a mismatch means the client rendered a stale board. `destination_len` is
    /// the number of tasks in the destination column excluding the moved task,
    /// and bounds the destination index.
    pub fn new(
        current: ColumnPosition,
        requested_from: ColumnPosition,
        requested_to: ColumnPosition,
        destination_len: i32,
    ) -> Result<Self, CoreError> {
        if requested_from != current {
            return Err(CoreError::Conflict(format!(
                "Task is at {}[{}], not {}[{}]; reload the board and retry",
                current.status, current.index, requested_from.status, requested_from.index
            )));
        }
        Ok(Self {
            source: current,
            destination: ColumnPosition {
                status: requested_to.status,
                index: requested_to.index.clamp(0, destination_len.max(0)),
            },
        })
    }

    /// Move a task to the end of `status`. Used when a task's status is
    /// changed outside the board.
    pub fn append(current: ColumnPosition, status: TaskStatus, destination_len: i32) -> Self {
        Self {
            source: current,
            destination: ColumnPosition {
                status,
                index: destination_len.max(0),
            },
        }
    }

    pub fn is_noop(&self) -> bool {
        self.source == self.destination
    }

    /// Apply the move to an in-memory board.
    pub fn apply(&self, moved: DbId, cards: &mut [Card]) {
        for card in cards.iter_mut().filter(|c| c.id != moved) {
            if card.status == self.source.status && card.order > self.source.index {
                card.order -= 1;
            }
        }
        for card in cards.iter_mut().filter(|c| c.id != moved) {
            if card.status == self.destination.status && card.order >= self.destination.index {
                card.order += 1;
            }
        }
        if let Some(card) = cards.iter_mut().find(|c| c.id == moved) {
            card.status = self.destination.status;
            card.order = self.destination.index;
        }
    }
}

/// Minimal view of a task for ordering purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub id: DbId,
    pub status: TaskStatus,
    pub order: i32,
}

/// True when every column's orders are exactly `0..n-1`.
pub fn is_contiguous(cards: &[Card]) -> bool {
    TaskStatus::ALL.iter().all(|status| {
        let mut orders: Vec<i32> = cards
            .iter()
            .filter(|c| c.status == *status)
            .map(|c| c.order)
            .collect();
        orders.sort_unstable();
        orders.iter().enumerate().all(|(i, o)| *o == i as i32)
    })
}

/// Group tasks into the five board columns, in board order.
///
/// Every column is present even when empty. Items whose status is `None`
/// (unrecognised) are dropped. Input order is preserved within a column, so
/// callers should pass tasks sorted by `(order, created_at)`.
pub fn group_columns<T>(
    items: impl IntoIterator<Item = T>,
    status_of: impl Fn(&T) -> Option<TaskStatus>,
) -> IndexMap<&'static str, Vec<T>> {
    let mut columns: IndexMap<&'static str, Vec<T>> = TaskStatus::ALL
        .iter()
        .map(|s| (s.as_str(), Vec::new()))
        .collect();
    for item in items {
        if let Some(status) = status_of(&item) {
            if let Some(column) = columns.get_mut(status.as_str()) {
                column.push(item);
            }
        }
    }
    columns
}
