use std::sync::{Arc, RwLock};

use sheetquery_core::Table;

/// Named slots in the table store.
///
/// `Primary` and `Unstructured` come from the main upload (structured sheet
/// and the `Unstructured_Data` sheet); `Secondary` holds the second dataset
/// for joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Primary,
    Unstructured,
    Secondary,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Primary => "primary",
            Slot::Unstructured => "unstructured",
            Slot::Secondary => "secondary",
        }
    }
}

/// Process-wide table state: a few named slots, each replaced wholesale on
/// upload. Each slot is guarded by its own lock; `replace` swaps the Arc
/// atomically, so readers hold a consistent snapshot of whichever table was
/// current when they read. No deletion API, no versioning — latest wins.
#[derive(Debug, Default)]
pub struct TableStore {
    primary: RwLock<Option<Arc<Table>>>,
    unstructured: RwLock<Option<Arc<Table>>>,
    secondary: RwLock<Option<Arc<Table>>>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, slot: Slot) -> &RwLock<Option<Arc<Table>>> {
        match slot {
            Slot::Primary => &self.primary,
            Slot::Unstructured => &self.unstructured,
            Slot::Secondary => &self.secondary,
        }
    }

    /// Replace a slot's table entirely. Previous state is discarded.
    pub fn replace(&self, slot: Slot, table: Table) {
        let mut guard = self.slot(slot).write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(Arc::new(table));
    }

    /// Snapshot of the slot's current table, if any.
    pub fn get(&self, slot: Slot) -> Option<Arc<Table>> {
        let guard = self.slot(slot).read().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetquery_core::{Column, Value};

    fn table_with_rows(n: usize) -> Table {
        Table::from_columns(vec![Column::new(
            "a",
            (0..n).map(|i| Value::Number(i as f64)).collect(),
        )])
        .unwrap()
    }

    #[test]
    fn test_empty_store() {
        let store = TableStore::new();
        assert!(store.get(Slot::Primary).is_none());
        assert!(store.get(Slot::Unstructured).is_none());
        assert!(store.get(Slot::Secondary).is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let store = TableStore::new();
        store.replace(Slot::Primary, table_with_rows(3));
        assert_eq!(store.get(Slot::Primary).unwrap().n_rows(), 3);

        store.replace(Slot::Primary, table_with_rows(1));
        assert_eq!(store.get(Slot::Primary).unwrap().n_rows(), 1);
    }

    #[test]
    fn test_slots_are_independent() {
        let store = TableStore::new();
        store.replace(Slot::Secondary, table_with_rows(2));
        assert!(store.get(Slot::Primary).is_none());
        assert_eq!(store.get(Slot::Secondary).unwrap().n_rows(), 2);
    }

    #[test]
    fn test_reader_keeps_snapshot_across_replace() {
        let store = TableStore::new();
        store.replace(Slot::Primary, table_with_rows(3));
        let snapshot = store.get(Slot::Primary).unwrap();
        store.replace(Slot::Primary, table_with_rows(5));
        // The held Arc still sees the old table
        assert_eq!(snapshot.n_rows(), 3);
        assert_eq!(store.get(Slot::Primary).unwrap().n_rows(), 5);
    }
}
