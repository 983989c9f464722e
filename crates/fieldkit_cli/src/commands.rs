//! One-shot subcommands built on the same session state machine.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fieldkit_io_xlsx::read_first_sheet;
use fieldkit_select::{
    AppState, EnumAction, EnumStatusLevel, HistoryStore, MemoryStorage, StorageBackend,
};

use crate::host::run_effects;
use crate::render::{render_headers, render_history};

/// Import `path_src` into `state`; fails with the session status on error.
fn import_or_bail<B: StorageBackend>(state: &mut AppState<B>, path_src: &Path) -> Result<()> {
    let l_effects = state.dispatch(EnumAction::BeginImport {
        path: path_src.to_path_buf(),
    });
    run_effects(state, l_effects, Path::new("."));
    if state.status().level == EnumStatusLevel::Error {
        bail!("{}: {}", path_src.display(), state.status().text);
    }
    Ok(())
}

/// Print the header row with indices.
pub fn cmd_headers<W: Write>(path_src: &Path, writer: &mut W) -> Result<()> {
    let table = read_first_sheet(path_src)
        .with_context(|| format!("Failed to read workbook: {}", path_src.display()))?;
    write!(writer, "{}", render_headers(&table.headers))?;
    Ok(())
}

/// Print the preview of `columns` (all columns when absent).
pub fn cmd_preview<W: Write>(path_src: &Path, columns: Option<&str>, writer: &mut W) -> Result<()> {
    let mut state = AppState::new(HistoryStore::new(MemoryStorage::new()));
    import_or_bail(&mut state, path_src)?;
    if let Some(c_columns) = columns {
        state.dispatch(EnumAction::InputChanged(c_columns.to_string()));
        state.dispatch(EnumAction::AddFromInput);
        writeln!(writer, "{}", state.status())?;
    }
    state.frame();
    write!(writer, "{}", state.preview())?;
    Ok(())
}

/// Column source for `extract`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumColumnSource {
    /// Free-text list, split like the input box.
    Names(String),
    /// Newest-first preset index.
    Preset(usize),
}

/// Extract columns into `<out_dir>/<stem>-extracted.xlsx`; returns the written path.
pub fn cmd_extract<B: StorageBackend, W: Write>(
    history: HistoryStore<B>,
    path_src: &Path,
    source: EnumColumnSource,
    sheet_name: Option<&str>,
    path_dir_out: &Path,
    writer: &mut W,
) -> Result<PathBuf> {
    let mut state = AppState::new(history);
    import_or_bail(&mut state, path_src)?;

    match source {
        EnumColumnSource::Names(c_columns) => {
            state.dispatch(EnumAction::InputChanged(c_columns));
            state.dispatch(EnumAction::AddFromInput);
        }
        EnumColumnSource::Preset(n_idx) => {
            state.dispatch(EnumAction::ApplyPreset(n_idx));
        }
    }
    writeln!(writer, "{}", state.status())?;
    if let Some(c_sheet_name) = sheet_name {
        state.dispatch(EnumAction::SetSheetName(c_sheet_name.to_string()));
    }

    let l_effects = state.dispatch(EnumAction::Export);
    let l_paths = run_effects(&mut state, l_effects, path_dir_out);
    match (state.status().level, l_paths.into_iter().next()) {
        (EnumStatusLevel::Info, Some(path_file_out)) => {
            writeln!(writer, "{}", state.status())?;
            Ok(path_file_out)
        }
        _ => bail!("{}", state.status().text),
    }
}

/// Print stored presets.
pub fn cmd_history_list<B: StorageBackend, W: Write>(
    history: &HistoryStore<B>,
    writer: &mut W,
) -> Result<()> {
    write!(writer, "{}", render_history(&history.load()))?;
    Ok(())
}

/// Drop stored presets.
pub fn cmd_history_clear<B: StorageBackend, W: Write>(
    history: &mut HistoryStore<B>,
    writer: &mut W,
) -> Result<()> {
    history.clear().context("Failed to clear presets")?;
    writeln!(writer, "History cleared")?;
    Ok(())
}
