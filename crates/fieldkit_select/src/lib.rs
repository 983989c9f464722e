//! `fieldkit_select` v1:
//! Column selection, preview and preset kernel for single-sheet extraction.
//!
//! Module layout:
//! - `conf`      : limits, storage key, naming defaults, delimiter patterns
//! - `spec`      : reports, preview/status/export models, errors
//! - `util`      : file stem / output name / sheet name helpers
//! - `store`     : loaded headers + rows with a lazily built header index
//! - `selection` : ordered unique selection and its index projection
//! - `preview`   : frame-coalescing scheduler and preview rendering
//! - `suggest`   : autocomplete over the free-text column input
//! - `history`   : persisted presets over a key-value backend
//! - `export`    : projection of the store onto the selection
//! - `session`   : action/effect state machine tying everything together
pub mod conf;
pub mod export;
pub mod history;
pub mod preview;
pub mod selection;
pub mod session;
pub mod spec;
pub mod store;
pub mod suggest;
pub mod util;

pub use export::{build_export_plan, derive_export_rows};
pub use history::{FileStorage, HistoryStore, MemoryStorage, StorageBackend};
pub use preview::{FrameHost, ManualFrameHost, PreviewScheduler, render_preview};
pub use selection::{Selection, derive_projection};
pub use session::{AppState, EnumAction, EnumEffect};
pub use spec::{
    EnumStatusLevel, SpecAddReport, SpecExportPlan, SpecHistoryEntry, SpecPreviewTable,
    SpecStatus, StorageError,
};
pub use store::{TabularStore, derive_header_index_map};
pub use suggest::{
    SuggestState, current_token, highlight, match_headers, parse_column_input,
    replace_trailing_token,
};
pub use util::{derive_file_stem, derive_output_file_name, resolve_sheet_name};
