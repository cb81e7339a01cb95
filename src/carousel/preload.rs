//! Preload planner - keeps a small window around the active slot warm
//!
//! The planner tracks which indices have a prefetch in flight so that a
//! slot is never requested twice concurrently. It does not perform I/O;
//! callers receive the newly scheduled indices and report completions back.
//!
//! Each dataset gets a generation number. Completions that carry an older
//! generation belong to a replaced (or unmounted) dataset and are ignored.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::PrefetchError;

/// Indices worth warming for `active_index`.
///
/// Always the direct neighbours (no wraparound), plus the slot two ahead
/// (with wraparound) when auto-advance will jump there next.
pub fn neighbors(active_index: usize, item_count: usize, auto_advance: bool) -> BTreeSet<usize> {
    let mut set = BTreeSet::new();
    if item_count == 0 || active_index >= item_count {
        return set;
    }
    if let Some(prev) = active_index.checked_sub(1) {
        set.insert(prev);
    }
    if active_index + 1 < item_count {
        set.insert(active_index + 1);
    }
    if auto_advance && item_count > 2 {
        set.insert((active_index + 2) % item_count);
    }
    set
}

/// Result of a completed prefetch as seen by the planner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Loaded,
    Failed(PrefetchError),
    /// Completion from an older dataset or for an index not in flight
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct PreloadPlanner {
    pending: BTreeSet<usize>,
    generation: u64,
}

impl PreloadPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> &BTreeSet<usize> {
        &self.pending
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.pending.contains(&index)
    }

    /// Compute the window and mark new members pending.
    ///
    /// Returns only the indices that need a prefetch issued now.
    pub fn plan(&mut self, active_index: usize, item_count: usize, auto_advance: bool) -> Vec<usize> {
        neighbors(active_index, item_count, auto_advance)
            .into_iter()
            .filter(|index| self.request(*index))
            .collect()
    }

    /// Mark a single index pending. False if it is already in flight.
    pub fn request(&mut self, index: usize) -> bool {
        let inserted = self.pending.insert(index);
        if !inserted {
            debug!("Preload: index {} already in flight", index);
        }
        inserted
    }

    /// Record a finished prefetch
    pub fn complete(
        &mut self,
        generation: u64,
        index: usize,
        result: Result<(), PrefetchError>,
    ) -> Completion {
        if generation != self.generation || !self.pending.remove(&index) {
            return Completion::Stale;
        }
        match result {
            Ok(()) => Completion::Loaded,
            Err(e) => Completion::Failed(e),
        }
    }

    /// Forget everything in flight; their completions become stale
    pub fn reset(&mut self) {
        self.pending.clear();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[usize]) -> BTreeSet<usize> {
        items.iter().copied().collect()
    }

    mod window {
        use super::*;

        #[test]
        fn five_items_without_auto_advance() {
            assert_eq!(neighbors(0, 5, false), set(&[1]));
            assert_eq!(neighbors(2, 5, false), set(&[1, 3]));
            assert_eq!(neighbors(4, 5, false), set(&[3]));
        }

        #[test]
        fn five_items_with_auto_advance() {
            assert_eq!(neighbors(2, 5, true), set(&[1, 3, 4]));
            // Two ahead wraps even though adjacency does not
            assert_eq!(neighbors(4, 5, true), set(&[3, 1]));
            assert_eq!(neighbors(3, 5, true), set(&[2, 4, 0]));
        }

        #[test]
        fn small_datasets() {
            assert_eq!(neighbors(0, 0, true), set(&[]));
            assert_eq!(neighbors(0, 1, true), set(&[]));
            assert_eq!(neighbors(0, 2, true), set(&[1]));
            assert_eq!(neighbors(1, 2, true), set(&[0]));
            assert_eq!(neighbors(0, 3, true), set(&[1, 2]));
        }

        #[test]
        fn active_index_never_included() {
            for count in 1..8 {
                for active in 0..count {
                    assert!(!neighbors(active, count, true).contains(&active));
                    assert!(neighbors(active, count, true).iter().all(|i| *i < count));
                }
            }
        }
    }

    mod pending {
        use super::*;

        #[test]
        fn duplicate_requests_are_suppressed() {
            let mut planner = PreloadPlanner::new();
            assert_eq!(planner.plan(2, 5, false), vec![1, 3]);
            // Second plan for the same window issues nothing
            assert!(planner.plan(2, 5, false).is_empty());
            // Moving on only issues the new neighbour
            assert_eq!(planner.plan(3, 5, false), vec![4]);
        }

        #[test]
        fn completion_clears_pending() {
            let mut planner = PreloadPlanner::new();
            planner.plan(0, 5, false);
            let generation = planner.generation();
            assert_eq!(planner.complete(generation, 1, Ok(())), Completion::Loaded);
            assert!(!planner.is_pending(1));
            // A completed index can be requested again
            assert_eq!(planner.plan(0, 5, false), vec![1]);
        }

        #[test]
        fn failure_clears_pending() {
            let mut planner = PreloadPlanner::new();
            planner.plan(0, 5, false);
            let generation = planner.generation();
            let err = PrefetchError::new("timeout");
            assert_eq!(
                planner.complete(generation, 1, Err(err.clone())),
                Completion::Failed(err)
            );
            assert!(planner.pending().is_empty());
        }

        #[test]
        fn reset_makes_completions_stale() {
            let mut planner = PreloadPlanner::new();
            planner.plan(0, 5, false);
            let old = planner.generation();
            planner.reset();
            assert!(planner.pending().is_empty());
            assert_eq!(planner.complete(old, 1, Ok(())), Completion::Stale);

            // Same index pending under the new generation is untouched by the old completion
            planner.plan(0, 5, false);
            assert_eq!(planner.complete(old, 1, Ok(())), Completion::Stale);
            assert!(planner.is_pending(1));
        }

        #[test]
        fn unknown_index_is_stale() {
            let mut planner = PreloadPlanner::new();
            assert_eq!(planner.complete(0, 3, Ok(())), Completion::Stale);
        }
    }
}
