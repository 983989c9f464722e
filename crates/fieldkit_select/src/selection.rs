//! Ordered column selection and its index projection.

use std::borrow::Cow;

use fieldkit_io_xlsx::normalize_header;

use crate::spec::SpecAddReport;
use crate::store::TabularStore;

/// User-ordered, duplicate-free subset of the store headers.
///
/// Every mutating call takes the store and recomputes the projection, which
/// is tagged with the store generation it was computed against.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    l_names: Vec<String>,
    l_projection: Vec<usize>,
    n_generation_projected: Option<u64>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected names in export order.
    pub fn names(&self) -> &[String] {
        &self.l_names
    }

    pub fn len(&self) -> usize {
        self.l_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.l_names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.l_names.iter().any(|c_name| c_name == name)
    }

    /// Append each known, not-yet-selected name in the given order.
    ///
    /// Candidates are trimmed and empties dropped silently. Unknown names and
    /// names already present (including repeats within `names`) count as skipped.
    pub fn add<S: AsRef<str>>(&mut self, store: &TabularStore, names: &[S]) -> SpecAddReport {
        let mut report = SpecAddReport::default();
        for c_raw in names {
            let c_name = normalize_header(c_raw.as_ref());
            if c_name.is_empty() {
                continue;
            }
            if !store.contains(&c_name) || self.contains(&c_name) {
                report.cnt_skipped += 1;
                continue;
            }
            self.l_names.push(c_name);
            report.cnt_added += 1;
        }

        self.recompute_projection(store);
        tracing::debug!(
            added = report.cnt_added,
            skipped = report.cnt_skipped,
            "selection add"
        );
        report
    }

    /// Drop every occurrence of `name`. Returns whether anything was removed.
    pub fn remove(&mut self, store: &TabularStore, name: &str) -> bool {
        let n_len_before = self.l_names.len();
        self.l_names.retain(|c_name| c_name != name);
        self.recompute_projection(store);
        self.l_names.len() != n_len_before
    }

    /// Replace the order wholesale with a permutation of the current names.
    ///
    /// Returns `false` (and keeps the old order) when `new_order` is not a permutation.
    pub fn reorder(&mut self, store: &TabularStore, new_order: Vec<String>) -> bool {
        if !is_permutation_of(&new_order, &self.l_names) {
            tracing::warn!(
                new_order = ?new_order,
                "reorder ignored: not a permutation of the current selection"
            );
            return false;
        }
        self.l_names = new_order;
        self.recompute_projection(store);
        true
    }

    /// Drag gesture: move the item at `from` to `to`.
    ///
    /// Missing, equal or out-of-range indices are a no-op.
    pub fn move_item(
        &mut self,
        store: &TabularStore,
        from: Option<usize>,
        to: Option<usize>,
    ) -> bool {
        let (Some(n_from), Some(n_to)) = (from, to) else {
            return false;
        };
        if n_from == n_to || n_from >= self.l_names.len() || n_to >= self.l_names.len() {
            return false;
        }

        let c_name = self.l_names.remove(n_from);
        self.l_names.insert(n_to, c_name);
        self.recompute_projection(store);
        true
    }

    /// Set the selection to the known subsequence of `columns`.
    ///
    /// Names missing from the store are dropped; returns how many were dropped.
    pub fn apply_preset<S: AsRef<str>>(&mut self, store: &TabularStore, columns: &[S]) -> usize {
        let mut l_names: Vec<String> = Vec::with_capacity(columns.len());
        let mut n_dropped = 0;
        for c_column in columns {
            let c_column = c_column.as_ref();
            if !store.contains(c_column) {
                n_dropped += 1;
                continue;
            }
            if !l_names.iter().any(|c_name| c_name == c_column) {
                l_names.push(c_column.to_string());
            }
        }

        self.l_names = l_names;
        self.recompute_projection(store);
        n_dropped
    }

    /// After a re-import: keep only names present in the new headers, in order.
    ///
    /// Returns the dropped names.
    pub fn retain_known(&mut self, store: &TabularStore) -> Vec<String> {
        let (l_kept, l_dropped): (Vec<String>, Vec<String>) = std::mem::take(&mut self.l_names)
            .into_iter()
            .partition(|c_name| store.contains(c_name));
        self.l_names = l_kept;
        self.recompute_projection(store);
        if !l_dropped.is_empty() {
            tracing::info!(dropped = ?l_dropped, "selection filtered against new headers");
        }
        l_dropped
    }

    /// Remove everything.
    pub fn clear(&mut self, store: &TabularStore) {
        self.l_names.clear();
        self.recompute_projection(store);
    }

    /// Recompute positions from the store lookup and tag them with its generation.
    pub fn recompute_projection(&mut self, store: &TabularStore) {
        self.l_projection = derive_projection(store, &self.l_names);
        self.n_generation_projected = Some(store.generation());
    }

    /// Positions of the selected columns in the store rows.
    ///
    /// Returns the cached projection when it matches the store generation,
    /// otherwise a freshly computed one.
    pub fn projection(&self, store: &TabularStore) -> Cow<'_, [usize]> {
        if self.n_generation_projected == Some(store.generation()) {
            Cow::Borrowed(&self.l_projection)
        } else {
            tracing::trace!("projection stale; recomputing for read");
            Cow::Owned(derive_projection(store, &self.l_names))
        }
    }
}

/// Resolve `names` to store positions, skipping unresolvable names.
pub fn derive_projection(store: &TabularStore, names: &[String]) -> Vec<usize> {
    names.iter().filter_map(|c_name| store.lookup(c_name)).collect()
}

fn is_permutation_of(candidate: &[String], current: &[String]) -> bool {
    if candidate.len() != current.len() {
        return false;
    }
    let mut l_candidate: Vec<&String> = candidate.iter().collect();
    let mut l_current: Vec<&String> = current.iter().collect();
    l_candidate.sort();
    l_current.sort();
    l_candidate == l_current
}
