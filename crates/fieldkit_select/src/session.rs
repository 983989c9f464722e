//! Single-owner application state driven by actions.
//!
//! The host feeds [`EnumAction`]s to [`AppState::dispatch`], executes the
//! returned [`EnumEffect`]s (file IO), reports their outcome back as actions,
//! and calls [`AppState::frame`] once per display frame.

use std::path::PathBuf;

use fieldkit_io_xlsx::SpecSheetTable;

use crate::conf::N_PREVIEW_ROWS_MAX;
use crate::export::build_export_plan;
use crate::history::{HistoryStore, StorageBackend};
use crate::preview::{ManualFrameHost, PreviewScheduler, render_preview};
use crate::selection::Selection;
use crate::spec::{
    EnumStatusLevel, SpecExportPlan, SpecHistoryEntry, SpecPreviewTable, SpecStatus,
};
use crate::store::TabularStore;
use crate::suggest::{SuggestState, parse_column_input};
use crate::util::derive_file_stem;

/// User intents and IO completions.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumAction {
    /// Start reading a workbook.
    BeginImport { path: PathBuf },
    /// A read finished.
    ImportLoaded { n_ticket: u64, table: SpecSheetTable },
    /// A read failed.
    ImportFailed { n_ticket: u64, message: String },
    /// Add every name typed in the input box.
    AddFromInput,
    /// Add the given names (header click, scripted add).
    AddNames(Vec<String>),
    Remove(String),
    /// Drag gesture.
    MoveItem {
        from: Option<usize>,
        to: Option<usize>,
    },
    /// Replace the selection order.
    Reorder(Vec<String>),
    /// Input box text changed.
    InputChanged(String),
    /// Enter in the input box: accept the highlighted suggestion if any, else add the input.
    InputSubmit,
    SuggestNext,
    SuggestPrev,
    /// Accept a suggestion (the highlighted one when `None`).
    SuggestAccept(Option<usize>),
    SuggestHide,
    /// Apply the preset at this newest-first index.
    ApplyPreset(usize),
    ClearHistory,
    SetSheetName(String),
    Export,
    /// The exported workbook was written.
    Exported { file_name: String },
    ExportFailed { message: String },
}

/// IO the host must perform.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumEffect {
    /// Read the first sheet of `path`; report back with the same ticket.
    ReadWorkbook { n_ticket: u64, path: PathBuf },
    /// Write the planned workbook.
    WriteWorkbook(SpecExportPlan),
}

/// Everything one session owns.
pub struct AppState<B: StorageBackend> {
    store: TabularStore,
    selection: Selection,
    scheduler: PreviewScheduler,
    frames: ManualFrameHost,
    suggest: SuggestState,
    c_input: String,
    c_file_name: Option<String>,
    c_file_name_pending: Option<String>,
    c_file_stem: String,
    c_sheet_name: String,
    status: SpecStatus,
    preview: SpecPreviewTable,
    history: HistoryStore<B>,
    n_import_ticket: u64,
}

impl<B: StorageBackend> AppState<B> {
    /// Fresh session: empty store, "Ready" status and a pending preview.
    pub fn new(history: HistoryStore<B>) -> Self {
        let mut state = Self {
            store: TabularStore::new(),
            selection: Selection::new(),
            scheduler: PreviewScheduler::new(),
            frames: ManualFrameHost::default(),
            suggest: SuggestState::new(),
            c_input: String::new(),
            c_file_name: None,
            c_file_name_pending: None,
            c_file_stem: derive_file_stem(""),
            c_sheet_name: String::new(),
            status: SpecStatus::default(),
            preview: SpecPreviewTable::default(),
            history,
            n_import_ticket: 0,
        };
        state.set_status("Ready", EnumStatusLevel::Info);
        state.schedule_preview();
        state
    }

    // #region Dispatch

    /// Apply one action; returns the IO the host must perform next.
    pub fn dispatch(&mut self, action: EnumAction) -> Vec<EnumEffect> {
        tracing::trace!(action = ?action, "dispatch");
        match action {
            EnumAction::BeginImport { path } => return self.begin_import(path),
            EnumAction::ImportLoaded { n_ticket, table } => self.on_import_loaded(n_ticket, table),
            EnumAction::ImportFailed { n_ticket, message } => {
                self.on_import_failed(n_ticket, &message)
            }
            EnumAction::AddFromInput => {
                let l_names = parse_column_input(&self.c_input);
                self.add_names(&l_names);
            }
            EnumAction::AddNames(l_names) => self.add_names(&l_names),
            EnumAction::Remove(c_name) => {
                if self.selection.remove(&self.store, &c_name) {
                    self.schedule_preview();
                }
            }
            EnumAction::MoveItem { from, to } => {
                if self.selection.move_item(&self.store, from, to) {
                    self.schedule_preview();
                }
            }
            EnumAction::Reorder(l_names) => {
                if self.selection.reorder(&self.store, l_names) {
                    self.schedule_preview();
                }
            }
            EnumAction::InputChanged(c_input) => {
                self.c_input = c_input;
                self.suggest.update(&self.c_input, self.store.headers());
            }
            EnumAction::InputSubmit => {
                if !(self.suggest.is_visible() && self.accept_suggestion(None)) {
                    let l_names = parse_column_input(&self.c_input);
                    self.add_names(&l_names);
                    self.suggest.hide();
                }
            }
            EnumAction::SuggestNext => self.suggest.select_next(),
            EnumAction::SuggestPrev => self.suggest.select_prev(),
            EnumAction::SuggestAccept(index) => {
                self.accept_suggestion(index);
            }
            EnumAction::SuggestHide => self.suggest.hide(),
            EnumAction::ApplyPreset(n_index) => self.apply_preset(n_index),
            EnumAction::ClearHistory => match self.history.clear() {
                Ok(()) => self.set_status("History cleared", EnumStatusLevel::Info),
                Err(err) => {
                    tracing::error!(error = %err, "failed to clear presets");
                    self.set_status(format!("Failed to clear history: {err}"), EnumStatusLevel::Error);
                }
            },
            EnumAction::SetSheetName(c_sheet_name) => self.c_sheet_name = c_sheet_name,
            EnumAction::Export => return self.export(),
            EnumAction::Exported { file_name } => self.on_exported(&file_name),
            EnumAction::ExportFailed { message } => {
                tracing::error!(error = %message, "export failed");
                self.set_status(format!("Export failed: {message}"), EnumStatusLevel::Error);
            }
        }
        Vec::new()
    }

    /// Frame callback: re-render the preview if one is pending.
    pub fn frame(&mut self) -> bool {
        if !self.scheduler.on_frame() {
            return false;
        }
        self.preview = render_preview(&self.store, &self.selection, N_PREVIEW_ROWS_MAX);
        tracing::trace!(n_runs = self.scheduler.n_runs(), "preview rendered");
        true
    }

    // #endregion
    // #region Handlers

    fn begin_import(&mut self, path: PathBuf) -> Vec<EnumEffect> {
        self.n_import_ticket += 1;
        let c_file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.c_file_name_pending = Some(c_file_name);
        self.set_status("Parsing…", EnumStatusLevel::Info);
        vec![EnumEffect::ReadWorkbook {
            n_ticket: self.n_import_ticket,
            path,
        }]
    }

    fn on_import_loaded(&mut self, n_ticket: u64, table: SpecSheetTable) {
        if n_ticket != self.n_import_ticket {
            tracing::debug!(n_ticket, n_current = self.n_import_ticket, "stale import dropped");
            return;
        }

        self.store.load_table(table);
        self.store.rebuild_index();
        let l_dropped = self.selection.retain_known(&self.store);

        let c_file_name = self.c_file_name_pending.take().unwrap_or_default();
        self.c_file_stem = derive_file_stem(&c_file_name);
        tracing::info!(
            file = %c_file_name,
            n_rows = self.store.n_rows(),
            n_cols = self.store.n_cols(),
            "workbook imported"
        );

        let mut c_status = format!(
            "Loaded {c_file_name} ({} data rows, {} columns)",
            self.store.n_rows(),
            self.store.n_cols()
        );
        if !l_dropped.is_empty() {
            c_status.push_str(&format!("; dropped from selection: {}", l_dropped.join(", ")));
        }
        self.c_file_name = Some(c_file_name);
        self.suggest.update(&self.c_input, self.store.headers());
        self.set_status(c_status, EnumStatusLevel::Info);
        self.schedule_preview();
    }

    fn on_import_failed(&mut self, n_ticket: u64, message: &str) {
        if n_ticket != self.n_import_ticket {
            tracing::debug!(n_ticket, n_current = self.n_import_ticket, "stale import failure dropped");
            return;
        }
        self.c_file_name_pending = None;
        tracing::error!(error = %message, "import failed");
        self.set_status(
            "Failed to parse; make sure the file is a valid .xlsx",
            EnumStatusLevel::Error,
        );
    }

    fn add_names(&mut self, names: &[String]) {
        let report = self.selection.add(&self.store, names);
        if report.is_noteworthy() {
            self.set_status(report.to_string(), EnumStatusLevel::Info);
        }
        self.schedule_preview();
    }

    fn accept_suggestion(&mut self, index: Option<usize>) -> bool {
        let Some((c_input, c_choice)) = self.suggest.accept(index, &self.c_input) else {
            return false;
        };
        self.c_input = c_input;
        self.add_names(&[c_choice]);
        true
    }

    fn apply_preset(&mut self, n_index: usize) {
        let Some(entry) = self.history.get(n_index) else {
            self.set_status(format!("No preset at index {n_index}"), EnumStatusLevel::Warn);
            return;
        };
        let n_dropped = self.selection.apply_preset(&self.store, &entry.columns);
        if n_dropped > 0 {
            tracing::debug!(n_dropped, preset = %entry.name, "preset columns missing from headers");
        }
        self.set_status(format!("Applied preset: {}", entry.name), EnumStatusLevel::Info);
        self.schedule_preview();
    }

    fn export(&mut self) -> Vec<EnumEffect> {
        if self.store.is_empty() {
            self.set_status("Load a file first", EnumStatusLevel::Warn);
            return Vec::new();
        }
        if self.selection.is_empty() {
            self.set_status("Select at least one column", EnumStatusLevel::Warn);
            return Vec::new();
        }
        let plan = build_export_plan(
            &self.store,
            &self.selection,
            &self.c_file_stem,
            &self.c_sheet_name,
        );
        vec![EnumEffect::WriteWorkbook(plan)]
    }

    fn on_exported(&mut self, file_name: &str) {
        if let Err(err) = self.history.save(&self.c_file_stem, self.selection.names()) {
            tracing::warn!(error = %err, "failed to record preset");
        }
        self.set_status(format!("Exported: {file_name}"), EnumStatusLevel::Info);
    }

    fn schedule_preview(&mut self) {
        self.scheduler.schedule(&mut self.frames);
    }

    fn set_status(&mut self, text: impl Into<String>, level: EnumStatusLevel) {
        self.status = SpecStatus {
            text: text.into(),
            level,
        };
    }

    // #endregion
    // #region Accessors

    pub fn store(&self) -> &TabularStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn suggest(&self) -> &SuggestState {
        &self.suggest
    }

    pub fn input(&self) -> &str {
        &self.c_input
    }

    /// Name of the loaded workbook, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.c_file_name.as_deref()
    }

    /// Stem used for the export name and for presets.
    pub fn file_stem(&self) -> &str {
        &self.c_file_stem
    }

    /// Raw sheet name as typed (may be blank).
    pub fn sheet_name(&self) -> &str {
        &self.c_sheet_name
    }

    pub fn status(&self) -> &SpecStatus {
        &self.status
    }

    /// Preview as of the last frame.
    pub fn preview(&self) -> &SpecPreviewTable {
        &self.preview
    }

    pub fn is_preview_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn n_preview_runs(&self) -> usize {
        self.scheduler.n_runs()
    }

    pub fn history(&self) -> &HistoryStore<B> {
        &self.history
    }

    pub fn history_entries(&self) -> Vec<SpecHistoryEntry> {
        self.history.load()
    }

    // #endregion
}
