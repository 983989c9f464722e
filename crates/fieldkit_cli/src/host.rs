//! Executes session effects against the filesystem.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use fieldkit_io_xlsx::{XlsxIoError, XlsxWriter, read_first_sheet};
use fieldkit_select::{AppState, EnumAction, EnumEffect, SpecExportPlan, StorageBackend};

/// Run `effects` (and every effect they trigger) to completion.
///
/// IO outcomes are fed back into `state` as actions. Returns the paths of the
/// workbooks written along the way.
pub fn run_effects<B: StorageBackend>(
    state: &mut AppState<B>,
    effects: Vec<EnumEffect>,
    path_dir_out: &Path,
) -> Vec<PathBuf> {
    let mut q_effects: VecDeque<EnumEffect> = effects.into();
    let mut l_paths_written = Vec::new();

    while let Some(effect) = q_effects.pop_front() {
        let action = match effect {
            EnumEffect::ReadWorkbook { n_ticket, path } => match read_first_sheet(&path) {
                Ok(table) => EnumAction::ImportLoaded { n_ticket, table },
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "read failed");
                    EnumAction::ImportFailed {
                        n_ticket,
                        message: err.to_string(),
                    }
                }
            },
            EnumEffect::WriteWorkbook(plan) => match write_export_plan(&plan, path_dir_out) {
                Ok(path_file_out) => {
                    l_paths_written.push(path_file_out);
                    EnumAction::Exported {
                        file_name: plan.file_name,
                    }
                }
                Err(err) => EnumAction::ExportFailed {
                    message: err.to_string(),
                },
            },
        };
        q_effects.extend(state.dispatch(action));
    }
    l_paths_written
}

/// Write `plan` as a new workbook named `plan.file_name` inside `path_dir_out`.
pub fn write_export_plan(plan: &SpecExportPlan, path_dir_out: &Path) -> Result<PathBuf, XlsxIoError> {
    let path_file_out = path_dir_out.join(&plan.file_name);
    let mut writer = XlsxWriter::with_defaults(path_file_out.clone());
    writer.write_sheet_from_rows(&plan.headers, &plan.rows, &plan.sheet_name)?;
    writer.close()?;

    for report in writer.report() {
        for c_warning in &report.warnings {
            tracing::warn!(file = %plan.file_name, "{c_warning}");
        }
    }
    Ok(path_file_out)
}

#[cfg(test)]
mod tests {
    use fieldkit_io_xlsx::EnumCellValue;
    use fieldkit_select::{EnumStatusLevel, HistoryStore, MemoryStorage};

    use super::*;
    use crate::test_util::write_people_workbook;

    #[test]
    fn import_and_export_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path_src = write_people_workbook(dir.path());

        let mut state = AppState::new(HistoryStore::new(MemoryStorage::new()));
        let l_effects = state.dispatch(EnumAction::BeginImport { path: path_src });
        run_effects(&mut state, l_effects, dir.path());
        assert_eq!(state.store().n_cols(), 3);

        state.dispatch(EnumAction::AddNames(vec!["City".to_string(), "Name".to_string()]));
        let l_effects = state.dispatch(EnumAction::Export);
        let l_paths = run_effects(&mut state, l_effects, dir.path());

        assert_eq!(l_paths, vec![dir.path().join("people-extracted.xlsx")]);
        let table = read_first_sheet(&l_paths[0]).unwrap();
        assert_eq!(table.headers, vec!["City", "Name"]);
        assert_eq!(
            table.rows[0],
            vec![EnumCellValue::from("NYC"), EnumCellValue::from("Alice")]
        );
        assert_eq!(state.history_entries()[0].name, "people");
    }

    #[test]
    fn unreadable_file_sets_error_status() {
        let dir = tempfile::tempdir().unwrap();
        let path_bad = dir.path().join("broken.xlsx");
        std::fs::write(&path_bad, b"not a workbook").unwrap();

        let mut state = AppState::new(HistoryStore::new(MemoryStorage::new()));
        let l_effects = state.dispatch(EnumAction::BeginImport { path: path_bad });
        run_effects(&mut state, l_effects, dir.path());

        assert_eq!(state.status().level, EnumStatusLevel::Error);
        assert!(state.store().is_empty());
    }
}
