//! Stateless helpers shared by the reader and the writer.

use std::collections::HashMap;

use crate::conf::{
    C_SHEET_NAME_FALLBACK, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL,
};
use crate::spec::{SpecSheetSlice, SpecXlsxReport, XlsxIoError};

////////////////////////////////////////////////////////////////////////////////
// #region HeaderUtils

/// Header text as stored and matched: surrounding whitespace removed.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_string()
}

/// Reject header rows that repeat a name; the message lists each repeat.
pub fn validate_unique_columns(columns: &[String]) -> Result<(), XlsxIoError> {
    let mut dict_first_pos: HashMap<&str, usize> = HashMap::with_capacity(columns.len());
    let mut l_repeats: Vec<String> = Vec::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        match dict_first_pos.get(c_name.as_str()) {
            Some(n_first) => l_repeats.push(format!("{c_name:?} at {n_first} and {n_idx}")),
            None => {
                dict_first_pos.insert(c_name, n_idx);
            }
        }
    }

    if l_repeats.is_empty() {
        Ok(())
    } else {
        Err(XlsxIoError::InvalidInput(format!(
            "Duplicate column names: {}",
            l_repeats.join("; ")
        )))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNaming

/// Make `name` acceptable to Excel.
///
/// Illegal characters become `replace_to`, surrounding whitespace and
/// apostrophes are stripped, the result is capped at 31 chars and a blank
/// result falls back to `Sheet`.
pub fn sanitize_sheet_name(name: &str, replace_to: char) -> String {
    let c_replaced: String = name
        .chars()
        .map(|ch| if TUP_EXCEL_ILLEGAL.contains(&ch) { replace_to } else { ch })
        .collect();
    let c_trimmed = c_replaced.trim().trim_matches('\'').trim();
    if c_trimmed.is_empty() {
        return C_SHEET_NAME_FALLBACK.to_string();
    }
    c_trimmed.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// `base` with a `suffix`, shortening `base` so the result fits the name cap.
pub fn derive_suffixed_sheet_name(base_name: &str, suffix: &str) -> String {
    let n_keep = N_LEN_EXCEL_SHEET_NAME_MAX
        .saturating_sub(suffix.chars().count())
        .max(1);
    let mut c_name: String = base_name.chars().take(n_keep).collect();
    c_name.push_str(suffix);
    c_name
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetSlicing

/// Data rows that fit on one worksheet below the header row.
pub const N_ROWS_PER_SHEET_MAX: usize = N_NROWS_EXCEL_MAX - 1;

/// Split `n_rows` data rows into worksheet-sized parts.
///
/// A single part keeps `sheet_name`; several parts are named `name_1`,
/// `name_2`, ... and a warning is added to `report`. Tables wider than the
/// Excel column limit are rejected.
pub fn plan_sheet_slices(
    n_rows: usize,
    n_cols: usize,
    sheet_name: &str,
    report: &mut SpecXlsxReport,
) -> Result<Vec<SpecSheetSlice>, XlsxIoError> {
    if n_cols > N_NCOLS_EXCEL_MAX {
        return Err(XlsxIoError::InvalidInput(format!(
            "{n_cols} columns exceed the Excel limit of {N_NCOLS_EXCEL_MAX}"
        )));
    }

    let n_parts = n_rows.div_ceil(N_ROWS_PER_SHEET_MAX).max(1);
    let l_slices: Vec<SpecSheetSlice> = (0..n_parts)
        .map(|n_part| {
            let n_row_start = n_part * N_ROWS_PER_SHEET_MAX;
            SpecSheetSlice {
                sheet_name: if n_parts == 1 {
                    sheet_name.to_string()
                } else {
                    derive_suffixed_sheet_name(sheet_name, &format!("_{}", n_part + 1))
                },
                row_start: n_row_start,
                row_end: usize::min(n_rows, n_row_start + N_ROWS_PER_SHEET_MAX),
            }
        })
        .collect();

    if n_parts > 1 {
        report.warn(format!(
            "{n_rows} rows exceed one worksheet; split into {n_parts} sheets"
        ));
    }
    Ok(l_slices)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
