//! Projection of the store onto the selection for export.

use fieldkit_io_xlsx::EnumCellValue;

use crate::selection::Selection;
use crate::spec::SpecExportPlan;
use crate::store::TabularStore;
use crate::util::{derive_output_file_name, resolve_sheet_name};

/// Every source row projected onto the selection, in selection order.
///
/// Cells missing from a short row become [`EnumCellValue::None`].
pub fn derive_export_rows(store: &TabularStore, selection: &Selection) -> Vec<Vec<EnumCellValue>> {
    let l_projection = selection.projection(store);
    store
        .rows()
        .iter()
        .map(|row| {
            l_projection
                .iter()
                .map(|n_pos| row.get(*n_pos).cloned().unwrap_or(EnumCellValue::None))
                .collect()
        })
        .collect()
}

/// Full plan for one export: file name, sheet name, header row and rows.
pub fn build_export_plan(
    store: &TabularStore,
    selection: &Selection,
    file_stem: &str,
    sheet_name_raw: &str,
) -> SpecExportPlan {
    SpecExportPlan {
        file_name: derive_output_file_name(file_stem),
        sheet_name: resolve_sheet_name(sheet_name_raw),
        headers: selection.names().to_vec(),
        rows: derive_export_rows(store, selection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_projects_rows_onto_selection() {
        let mut store = TabularStore::new();
        store.load(
            vec!["Name".to_string(), "Age".to_string(), "City".to_string()],
            vec![
                vec![
                    EnumCellValue::from("Alice"),
                    EnumCellValue::Number(30.0),
                    EnumCellValue::from("NYC"),
                ],
                vec![EnumCellValue::from("Bob")],
            ],
        );
        store.rebuild_index();
        let mut selection = Selection::new();
        selection.add(&store, &["City", "Name"]);

        let plan = build_export_plan(&store, &selection, "people", " ");
        assert_eq!(plan.file_name, "people-extracted.xlsx");
        assert_eq!(plan.sheet_name, "Extracted");
        assert_eq!(plan.headers, vec!["City", "Name"]);
        assert_eq!(
            plan.rows,
            vec![
                vec![EnumCellValue::from("NYC"), EnumCellValue::from("Alice")],
                vec![EnumCellValue::None, EnumCellValue::from("Bob")],
            ]
        );
    }
}
