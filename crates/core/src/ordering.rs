//! Dense ordering of prints within a gallery.
//!
//! [`MemberOrder`] is the in-memory state of one gallery's membership: the
//! member ids in display order, where the member at index `i` has order
//! `i + 1`. Every operation is a total transition from one dense state to
//! another, or it returns an error and leaves the state untouched. The
//! repository layer loads a `MemberOrder` under a row lock, applies one
//! operation and writes back only the rows whose order changed.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// One `(print, order)` pair, used both for requested reorders and for the
/// rows a transition needs to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAssignment {
    pub print_id: DbId,
    pub sort_order: i32,
}

impl OrderAssignment {
    pub fn new(print_id: DbId, sort_order: i32) -> Self {
        Self {
            print_id,
            sort_order,
        }
    }
}

/// Convert a zero-based index into a one-based order value.
fn order_at(index: usize) -> i32 {
    i32::try_from(index + 1).unwrap_or(i32::MAX)
}

/// Clamp a requested one-based insert position to `[1, len + 1]`.
pub fn clamp_position(position: i64, len: usize) -> usize {
    let upper = len as i64 + 1;
    position.clamp(1, upper) as usize
}

/// Whether a set of order values is exactly `{1, ..., N}`.
pub fn is_dense(orders: impl IntoIterator<Item = i32>) -> bool {
    let mut orders: Vec<i32> = orders.into_iter().collect();
    orders.sort_unstable();
    orders.iter().enumerate().all(|(i, &o)| o == order_at(i))
}

/// The ordered member list of one gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberOrder {
    gallery_id: DbId,
    members: Vec<DbId>,
}

impl MemberOrder {
    /// An empty gallery.
    pub fn new(gallery_id: DbId) -> Self {
        Self {
            gallery_id,
            members: Vec::new(),
        }
    }

    /// Build from stored `(print_id, sort_order)` rows.
    ///
    /// Rows are sorted by order (then id), so the resulting state is dense
    /// even if the stored values were not.
    pub fn from_rows(gallery_id: DbId, rows: impl IntoIterator<Item = (DbId, i32)>) -> Self {
        let mut rows: Vec<(DbId, i32)> = rows.into_iter().collect();
        rows.sort_by_key(|&(id, order)| (order, id));
        Self {
            gallery_id,
            members: rows.into_iter().map(|(id, _)| id).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member ids in display order.
    pub fn members(&self) -> &[DbId] {
        &self.members
    }

    pub fn contains(&self, print_id: DbId) -> bool {
        self.members.contains(&print_id)
    }

    /// One-based order of a member, if present.
    pub fn order_of(&self, print_id: DbId) -> Option<i32> {
        self.members
            .iter()
            .position(|&id| id == print_id)
            .map(order_at)
    }

    /// Every member with its dense order.
    pub fn assignments(&self) -> Vec<OrderAssignment> {
        self.members
            .iter()
            .enumerate()
            .map(|(i, &id)| OrderAssignment::new(id, order_at(i)))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Append a member at order `N + 1`.
    pub fn append(&mut self, print_id: DbId) -> Result<i32, CoreError> {
        self.ensure_absent(print_id)?;
        self.members.push(print_id);
        Ok(order_at(self.members.len() - 1))
    }

    /// Insert a member at a one-based `position`, clamped to `[1, N + 1]`.
    ///
    /// Members at `order >= position` move down by one. Returns the order
    /// the new member received.
    pub fn insert_at(&mut self, print_id: DbId, position: i64) -> Result<i32, CoreError> {
        self.ensure_absent(print_id)?;
        let position = clamp_position(position, self.members.len());
        self.members.insert(position - 1, print_id);
        Ok(order_at(position - 1))
    }

    /// Remove a member. Members after it move up by one.
    ///
    /// Returns the order the member held before removal.
    pub fn remove(&mut self, print_id: DbId) -> Result<i32, CoreError> {
        let index = self
            .members
            .iter()
            .position(|&id| id == print_id)
            .ok_or(CoreError::NotFound {
                entity: "GalleryPrint",
                id: print_id,
            })?;
        self.members.remove(index);
        Ok(order_at(index))
    }

    /// Apply a batch reorder.
    ///
    /// Every referenced print must already be a member; otherwise the first
    /// offender is reported and nothing changes. Requested order values are
    /// used only as sort keys: members not named in the batch keep their
    /// current order as their key, and the final state is re-numbered
    /// `1..N`. On equal keys a named member moving towards the front sorts
    /// before unnamed members and one moving towards the back sorts after
    /// them, so a single "move X to k" lands X exactly at `k`.
    pub fn reorder(&mut self, requested: &[OrderAssignment]) -> Result<(), CoreError> {
        let mut seen = HashSet::with_capacity(requested.len());
        for entry in requested {
            if !self.contains(entry.print_id) {
                return Err(CoreError::MemberNotInParent {
                    gallery_id: self.gallery_id,
                    print_id: entry.print_id,
                });
            }
            if !seen.insert(entry.print_id) {
                return Err(CoreError::Validation(format!(
                    "Print {} appears more than once in the reorder batch",
                    entry.print_id
                )));
            }
        }

        let named: HashMap<DbId, (usize, i32)> = requested
            .iter()
            .enumerate()
            .map(|(seq, entry)| (entry.print_id, (seq, entry.sort_order)))
            .collect();

        // (key, class, tiebreak, id); class 0 = named moving forward or in
        // place, 1 = untouched, 2 = named moving back.
        let mut keyed: Vec<(i64, u8, usize, DbId)> = self
            .members
            .iter()
            .enumerate()
            .map(|(index, &id)| {
                let current = i64::from(order_at(index));
                match named.get(&id) {
                    Some(&(seq, key)) => {
                        let key = i64::from(key);
                        let class = if key > current { 2 } else { 0 };
                        (key, class, seq, id)
                    }
                    None => (current, 1, index, id),
                }
            })
            .collect();

        keyed.sort_by(|a, b| match a.0.cmp(&b.0) {
            Ordering::Equal => (a.1, a.2).cmp(&(b.1, b.2)),
            other => other,
        });

        self.members = keyed.into_iter().map(|(_, _, _, id)| id).collect();
        Ok(())
    }

    /// Rows whose order differs from `before`.
    ///
    /// Only members present in both states are reported; inserted and
    /// removed members are written by the caller.
    pub fn changes_since(&self, before: &MemberOrder) -> Vec<OrderAssignment> {
        let previous: HashMap<DbId, i32> = before
            .assignments()
            .into_iter()
            .map(|a| (a.print_id, a.sort_order))
            .collect();

        self.assignments()
            .into_iter()
            .filter(|a| matches!(previous.get(&a.print_id), Some(&old) if old != a.sort_order))
            .collect()
    }

    fn ensure_absent(&self, print_id: DbId) -> Result<(), CoreError> {
        if self.contains(print_id) {
            return Err(CoreError::DuplicateMember {
                gallery_id: self.gallery_id,
                print_id,
            });
        }
        Ok(())
    }
}
