//! Frame-coalesced preview rendering.

use crate::selection::Selection;
use crate::spec::SpecPreviewTable;
use crate::store::TabularStore;

/// Host primitive that arranges for a callback on the next display frame.
pub trait FrameHost {
    /// Ask for one frame; the host later calls [`PreviewScheduler::on_frame`].
    fn request_frame(&mut self);
}

/// Frame host that only counts requests; the driver loop pumps frames itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualFrameHost {
    pub n_frames_requested: usize,
}

impl FrameHost for ManualFrameHost {
    fn request_frame(&mut self) {
        self.n_frames_requested += 1;
    }
}

/// Coalesces any number of preview requests into one recomputation per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewScheduler {
    if_pending: bool,
    n_runs: usize,
}

impl PreviewScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a recomputation as pending.
    ///
    /// Only the first call while idle requests a frame from `host`; returns
    /// whether this call did so.
    pub fn schedule<H: FrameHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.if_pending {
            return false;
        }
        self.if_pending = true;
        host.request_frame();
        true
    }

    pub fn is_pending(&self) -> bool {
        self.if_pending
    }

    /// Frame callback: clears the pending flag and reports whether to recompute.
    pub fn on_frame(&mut self) -> bool {
        if !self.if_pending {
            return false;
        }
        self.if_pending = false;
        self.n_runs += 1;
        true
    }

    /// [`Self::on_frame`] that runs `job` when a recomputation is due.
    pub fn run_frame<F: FnOnce()>(&mut self, job: F) -> bool {
        let if_due = self.on_frame();
        if if_due {
            job();
        }
        if_due
    }

    /// Recomputations performed so far.
    pub fn n_runs(&self) -> usize {
        self.n_runs
    }
}

/// Render up to `n_rows_max` rows of the current view.
///
/// A non-empty selection shows its columns in selection order; otherwise every
/// store header is shown in store order.
pub fn render_preview(
    store: &TabularStore,
    selection: &Selection,
    n_rows_max: usize,
) -> SpecPreviewTable {
    if store.is_empty() {
        return SpecPreviewTable::default();
    }

    let (l_headers, l_positions): (Vec<String>, Vec<Option<usize>>) = if selection.is_empty() {
        store
            .headers()
            .iter()
            .map(|c_header| (c_header.clone(), store.lookup(c_header)))
            .unzip()
    } else {
        let l_projection = selection.projection(store);
        (
            selection.names().to_vec(),
            l_projection.iter().map(|n_pos| Some(*n_pos)).collect(),
        )
    };

    let l_rows = store
        .rows()
        .iter()
        .take(n_rows_max)
        .map(|row| {
            l_positions
                .iter()
                .map(|n_pos| {
                    n_pos
                        .and_then(|n_pos| row.get(n_pos))
                        .map(|cell| cell.to_text())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    SpecPreviewTable {
        headers: l_headers,
        rows: l_rows,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use fieldkit_io_xlsx::EnumCellValue;

    use super::*;
    use crate::conf::N_PREVIEW_ROWS_MAX;

    fn build_people_store() -> TabularStore {
        let mut store = TabularStore::new();
        store.load(
            vec!["Name".to_string(), "Age".to_string(), "City".to_string()],
            vec![
                vec![
                    EnumCellValue::from("Alice"),
                    EnumCellValue::Number(30.0),
                    EnumCellValue::from("NYC"),
                ],
                vec![EnumCellValue::from("Bob"), EnumCellValue::Number(41.5)],
            ],
        );
        store.rebuild_index();
        store
    }

    #[test]
    fn several_schedules_in_one_frame_run_once() {
        let mut host = ManualFrameHost::default();
        let mut scheduler = PreviewScheduler::new();

        assert!(scheduler.schedule(&mut host));
        assert!(!scheduler.schedule(&mut host));
        assert!(!scheduler.schedule(&mut host));
        assert_eq!(host.n_frames_requested, 1);

        let n_calls = Cell::new(0);
        assert!(scheduler.run_frame(|| n_calls.set(n_calls.get() + 1)));
        assert!(!scheduler.run_frame(|| n_calls.set(n_calls.get() + 1)));
        assert_eq!(n_calls.get(), 1);
        assert_eq!(scheduler.n_runs(), 1);

        assert!(scheduler.schedule(&mut host));
        assert_eq!(host.n_frames_requested, 2);
    }

    #[test]
    fn preview_follows_selection_order() {
        let store = build_people_store();
        let mut selection = Selection::new();
        selection.add(&store, &["City", "Name"]);

        let table = render_preview(&store, &selection, N_PREVIEW_ROWS_MAX);
        assert_eq!(table.headers, vec!["City", "Name"]);
        assert_eq!(table.rows[0], vec!["NYC", "Alice"]);
        assert_eq!(table.rows[1], vec!["", "Bob"]);
    }

    #[test]
    fn preview_without_selection_shows_all_headers() {
        let store = build_people_store();
        let table = render_preview(&store, &Selection::new(), 1);
        assert_eq!(table.headers, vec!["Name", "Age", "City"]);
        assert_eq!(table.rows, vec![vec!["Alice", "30", "NYC"]]);
    }

    #[test]
    fn preview_of_empty_store_is_empty() {
        let table = render_preview(&TabularStore::new(), &Selection::new(), N_PREVIEW_ROWS_MAX);
        assert!(table.is_empty());
    }
}
