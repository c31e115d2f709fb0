//! Diff between two meta declaration lists of one component.
//!
//! [`reconcile`] is pure: it only reports what happened to each position and
//! leaves registry bookkeeping to the caller.

use crate::meta::MetaRecord;

/// Outcome for one position of the previous or next list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetaOp {
    /// `next[next]` is content-equal to `previous[previous]`; nothing to do.
    Keep { previous: usize, next: usize },
    /// `next[next]` replaces `previous[previous]` for the same tag instance.
    Change { previous: usize, next: usize },
    /// `next[next]` has no counterpart.
    Add { next: usize },
    /// `previous[previous]` was withdrawn.
    Remove { previous: usize },
}

impl MetaOp {
    /// Whether the op requires a registry mutation.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, MetaOp::Keep { .. })
    }
}

/// Computes the operations that turn `previous` into `next`.
///
/// Content-equal pairs are matched first, so an unchanged record is never
/// consumed by a change of an earlier sibling. Remaining next records then
/// claim an unclaimed previous record for the same tag instance, and are added
/// otherwise. Previous records nobody claimed are removed. Ops are emitted in
/// `next` order, with removals last.
pub fn reconcile(previous: &[MetaRecord], next: &[MetaRecord]) -> Vec<MetaOp> {
    let previous_keys: Vec<_> = previous.iter().map(MetaRecord::structural_key).collect();
    let mut claimed = vec![false; previous.len()];
    let mut matched: Vec<Option<MetaOp>> = vec![None; next.len()];

    for (next_index, record) in next.iter().enumerate() {
        let key = record.structural_key();
        let unchanged = (0..previous.len())
            .find(|&i| !claimed[i] && previous_keys[i] == key && previous[i] == *record);
        if let Some(i) = unchanged {
            claimed[i] = true;
            matched[next_index] = Some(MetaOp::Keep {
                previous: i,
                next: next_index,
            });
        }
    }

    for (next_index, record) in next.iter().enumerate() {
        if matched[next_index].is_some() {
            continue;
        }
        let instance = record.instance();
        let replaced =
            (0..previous.len()).find(|&i| !claimed[i] && previous[i].instance() == instance);
        matched[next_index] = Some(match replaced {
            Some(i) => {
                claimed[i] = true;
                MetaOp::Change {
                    previous: i,
                    next: next_index,
                }
            }
            None => MetaOp::Add { next: next_index },
        });
    }

    let mut ops: Vec<MetaOp> = matched.into_iter().flatten().collect();
    ops.extend(
        claimed
            .iter()
            .enumerate()
            .filter(|(_, claimed)| !**claimed)
            .map(|(i, _)| MetaOp::Remove { previous: i }),
    );
    ops
}

/// Counts the ops that touch the registry.
pub fn mutation_count(ops: &[MetaOp]) -> usize {
    ops.iter().filter(|op| op.is_mutation()).count()
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
