//! Swappable handle to the current index.
//!
//! Readers take an `Arc` snapshot and traverse it without holding any lock.
//! A rebuild constructs the new index first and only then swaps the pointer,
//! so a failed rebuild leaves the previous index in service.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use super::index::HierarchyIndex;
use crate::error::BuildError;
use crate::store::TaxonomyStore;

/// Shared, rebuildable [`HierarchyIndex`].
#[derive(Debug, Default)]
pub struct SharedIndex {
    current: RwLock<Arc<HierarchyIndex>>,
}

impl SharedIndex {
    pub fn new(index: HierarchyIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// Build the initial index from `store`.
    ///
    /// # Errors
    ///
    /// Any error from [`HierarchyIndex::load`].
    pub fn load<S: TaxonomyStore + ?Sized>(store: &S) -> Result<Self, BuildError> {
        HierarchyIndex::load(store).map(Self::new)
    }

    /// The index currently in service.
    pub fn snapshot(&self) -> Arc<HierarchyIndex> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Rebuild from `store` and swap the result in.
    ///
    /// The store is read and the index validated outside the lock. Existing
    /// snapshots keep pointing at the index they were taken from.
    ///
    /// # Errors
    ///
    /// Returns the build error and keeps serving the previous index.
    pub fn rebuild<S: TaxonomyStore + ?Sized>(
        &self,
        store: &S,
    ) -> Result<Arc<HierarchyIndex>, BuildError> {
        let fresh = match HierarchyIndex::load(store) {
            Ok(index) => Arc::new(index),
            Err(err) => {
                warn!(error = %err, "index rebuild failed; keeping previous index");
                return Err(err);
            }
        };

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&fresh);
        drop(guard);

        debug!(
            nodes = fresh.node_count(),
            edges = fresh.edge_count(),
            "swapped in rebuilt index"
        );
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store_v1() -> MemoryStore {
        MemoryStore::new()
            .with_node("func_1", "Solvents")
            .with_root("func_1")
    }

    #[test]
    fn rebuild_swaps_on_success() {
        let shared = SharedIndex::load(&store_v1()).unwrap();
        let before = shared.snapshot();

        let v2 = store_v1()
            .with_node("func_2", "Aromatic Solvents")
            .with_edge("func_1", "func_2");
        shared.rebuild(&v2).unwrap();

        assert_eq!(before.node_count(), 1);
        assert_eq!(shared.snapshot().node_count(), 2);
    }

    #[test]
    fn failed_rebuild_keeps_previous_index() {
        let shared = SharedIndex::load(&store_v1()).unwrap();

        let broken = store_v1().with_edge("func_1", "func_missing");
        let err = shared.rebuild(&broken).unwrap_err();

        assert!(matches!(err, BuildError::DanglingReference { .. }));
        assert_eq!(shared.snapshot().node_count(), 1);
        assert!(shared.snapshot().contains("func_1"));
    }

    #[test]
    fn snapshots_are_shareable_across_threads() {
        let shared = Arc::new(SharedIndex::load(&store_v1()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || shared.snapshot().roots().len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}
