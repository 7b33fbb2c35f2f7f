use crate::mock_data;
use crate::models::{stamped, Supplier};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Session-scoped supplier list served while the backend is unavailable.
///
/// Suppliers added on the fallback path are appended here so later fallback
/// listings include them. The store is never empty: an empty seed is replaced
/// with the demo dataset, which keeps id assignment anchored on a prior record.
pub struct FallbackStore {
    suppliers: Mutex<Vec<Supplier>>,
}

impl FallbackStore {
    pub fn new(seed: Vec<Supplier>) -> Self {
        Self {
            suppliers: Mutex::new(Self::prepare(seed)),
        }
    }

    /// Store seeded with the fixed demo dataset.
    pub fn with_demo_data() -> Self {
        Self::new(mock_data::seed_suppliers())
    }

    fn prepare(seed: Vec<Supplier>) -> Vec<Supplier> {
        let seed = if seed.is_empty() {
            mock_data::seed_suppliers()
        } else {
            seed
        };
        seed.into_iter().map(|s| stamped(s, true)).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Supplier>> {
        // Every mutation is a single push or a full replace, so a poisoned
        // guard still holds a consistent list.
        self.suppliers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every stored supplier in insertion order.
    pub fn suppliers(&self) -> Vec<Supplier> {
        self.lock().clone()
    }

    pub fn get(&self, id: i64) -> Option<Supplier> {
        self.lock().iter().find(|s| s.id == id).cloned()
    }

    /// The supplier with `id`, or the first stored one when it is unknown.
    pub fn get_or_first(&self, id: i64) -> Supplier {
        let guard = self.lock();
        guard
            .iter()
            .find(|s| s.id == id)
            .or_else(|| guard.first())
            .cloned()
            .unwrap_or_else(mock_data::demo_supplier)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Appends the supplier produced by `build`, handing it one more than the
    /// highest stored id. Id selection and the append happen under one lock.
    pub fn insert_with<F>(&self, build: F) -> Supplier
    where
        F: FnOnce(i64) -> Supplier,
    {
        let mut guard = self.lock();
        let next_id = guard.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let supplier = stamped(build(next_id), true);
        guard.push(supplier.clone());
        tracing::debug!(
            "Fallback store now holds {} suppliers (added id {})",
            guard.len(),
            next_id
        );
        supplier
    }

    /// Replaces the contents, for tests and demo resets.
    pub fn reset(&self, seed: Vec<Supplier>) {
        *self.lock() = Self::prepare(seed);
    }
}

impl Default for FallbackStore {
    fn default() -> Self {
        Self::with_demo_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_seed_uses_demo_data() {
        let store = FallbackStore::new(Vec::new());
        assert_eq!(store.len(), 12);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_insert_assigns_max_plus_one() {
        let mut seed = mock_data::seed_suppliers();
        seed.truncate(2);
        seed[1].id = 40;
        seed[1].is_mock_data = false;
        let store = FallbackStore::new(seed);
        assert!(store.suppliers().iter().all(|s| s.is_mock_data));

        let added = store.insert_with(|id| {
            let mut s = mock_data::demo_supplier();
            s.id = id;
            s.is_mock_data = false;
            s
        });
        assert_eq!(added.id, 41);
        assert!(added.is_mock_data);
        assert_eq!(store.get(41), Some(added));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_get_or_first_falls_back_to_first() {
        let store = FallbackStore::with_demo_data();
        assert_eq!(store.get_or_first(3).name, "Unilever");
        assert_eq!(store.get_or_first(999).id, 1);
        assert_eq!(store.get(999), None);
    }

    #[test]
    fn test_reset_restores_seed() {
        let store = FallbackStore::with_demo_data();
        store.insert_with(|id| {
            let mut s = mock_data::demo_supplier();
            s.id = id;
            s
        });
        assert_eq!(store.len(), 13);
        store.reset(mock_data::seed_suppliers());
        assert_eq!(store.len(), 12);
    }

    #[test]
    fn test_concurrent_inserts_get_unique_ids() {
        let store = Arc::new(FallbackStore::with_demo_data());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .insert_with(|id| {
                            let mut s = mock_data::demo_supplier();
                            s.id = id;
                            s
                        })
                        .id
                })
            })
            .collect();

        let mut ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (13..=20).collect::<Vec<_>>());
    }
}
