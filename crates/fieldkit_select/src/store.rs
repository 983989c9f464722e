//! Tabular store: current headers, data rows and the header→index cache.

use std::cell::OnceCell;
use std::collections::HashMap;

use fieldkit_io_xlsx::{EnumCellValue, SpecSheetTable, normalize_header};

/// Parsed sheet content plus a lazily built header lookup.
///
/// The lookup cache is reset by every [`TabularStore::load`], so it can never
/// outlive the headers it was built from. `generation` counts loads and lets
/// derived data (see [`crate::Selection`]) detect staleness.
#[derive(Debug, Clone, Default)]
pub struct TabularStore {
    headers: Vec<String>,
    rows: Vec<Vec<EnumCellValue>>,
    n_generation: u64,
    dict_header_index: OnceCell<HashMap<String, usize>>,
}

impl TabularStore {
    /// Empty store (generation 0, no headers).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace headers and rows wholesale; invalidates the lookup cache.
    pub fn load(&mut self, headers: Vec<String>, rows: Vec<Vec<EnumCellValue>>) {
        self.headers = headers.iter().map(|h| normalize_header(h)).collect();
        self.rows = rows;
        self.dict_header_index = OnceCell::new();
        self.n_generation += 1;
        tracing::debug!(
            generation = self.n_generation,
            n_cols = self.headers.len(),
            n_rows = self.rows.len(),
            "store loaded"
        );
    }

    /// [`Self::load`] from a reader result.
    pub fn load_table(&mut self, table: SpecSheetTable) {
        self.load(table.headers, table.rows);
    }

    /// Recompute the header→index map from the current headers.
    pub fn rebuild_index(&mut self) {
        self.dict_header_index = OnceCell::from(derive_header_index_map(&self.headers));
    }

    /// Whether the lookup cache is built for the current headers.
    pub fn is_index_built(&self) -> bool {
        self.dict_header_index.get().is_some()
    }

    /// Position of `header`; builds the cache on first use after a load.
    ///
    /// Duplicate header texts resolve to their last occurrence.
    pub fn lookup(&self, header: &str) -> Option<usize> {
        self.header_index().get(header).copied()
    }

    /// Whether `header` is one of the current headers.
    pub fn contains(&self, header: &str) -> bool {
        self.lookup(header).is_some()
    }

    fn header_index(&self) -> &HashMap<String, usize> {
        self.dict_header_index.get_or_init(|| {
            tracing::trace!(generation = self.n_generation, "header index built on demand");
            derive_header_index_map(&self.headers)
        })
    }

    /// Current headers in sheet order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Current data rows.
    pub fn rows(&self) -> &[Vec<EnumCellValue>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of headers.
    pub fn n_cols(&self) -> usize {
        self.headers.len()
    }

    /// True when no headers are loaded (nothing to select or export).
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Load counter.
    pub fn generation(&self) -> u64 {
        self.n_generation
    }
}

/// Map each header to its position; later duplicates overwrite earlier ones.
pub fn derive_header_index_map(headers: &[String]) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(n_idx, c_header)| (c_header.clone(), n_idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lookup_after_rebuild() {
        let mut store = TabularStore::new();
        store.load(to_strings(&["Name", " Age ", "City"]), vec![]);
        store.rebuild_index();

        assert!(store.is_index_built());
        assert_eq!(store.headers(), to_strings(&["Name", "Age", "City"]).as_slice());
        assert_eq!(store.lookup("Age"), Some(1));
        assert_eq!(store.lookup("Zip"), None);
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn lookup_before_rebuild_never_sees_previous_load() {
        let mut store = TabularStore::new();
        store.load(to_strings(&["A", "B"]), vec![]);
        store.rebuild_index();
        assert_eq!(store.lookup("B"), Some(1));

        store.load(to_strings(&["B", "C"]), vec![]);
        assert!(!store.is_index_built());
        assert_eq!(store.lookup("B"), Some(0));
        assert_eq!(store.lookup("A"), None);
        assert!(store.is_index_built());
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn duplicate_headers_resolve_to_last_occurrence() {
        let mut store = TabularStore::new();
        store.load(to_strings(&["X", "Y", "X"]), vec![]);
        assert_eq!(store.lookup("X"), Some(2));
    }

    #[test]
    fn load_table_copies_rows() {
        let mut store = TabularStore::new();
        store.load_table(SpecSheetTable {
            headers: to_strings(&["Name"]),
            rows: vec![vec![EnumCellValue::from("Alice")]],
        });
        assert_eq!(store.n_rows(), 1);
        assert_eq!(store.n_cols(), 1);
        assert!(!store.is_empty());
    }
}
