//! File and sheet naming helpers.

use crate::conf::{
    C_EXPORT_FILE_SUFFIX, C_FILE_STEM_DEFAULT, C_SHEET_NAME_DEFAULT, C_XLSX_EXTENSION,
};

/// Strip a trailing `.xlsx` (case-insensitive) from `file_name`; `data` if nothing is left.
pub fn derive_file_stem(file_name: &str) -> String {
    let n_len_ext = C_XLSX_EXTENSION.len();
    let c_stem = match file_name.len().checked_sub(n_len_ext) {
        Some(n_split)
            if file_name
                .get(n_split..)
                .is_some_and(|c_ext| c_ext.eq_ignore_ascii_case(C_XLSX_EXTENSION)) =>
        {
            &file_name[..n_split]
        }
        _ => file_name,
    };

    if c_stem.is_empty() {
        C_FILE_STEM_DEFAULT.to_string()
    } else {
        c_stem.to_string()
    }
}

/// Exported workbook name: `<stem>-extracted.xlsx`.
pub fn derive_output_file_name(file_stem: &str) -> String {
    format!("{file_stem}{C_EXPORT_FILE_SUFFIX}{C_XLSX_EXTENSION}")
}

/// Trimmed user sheet name, or the default label when blank.
pub fn resolve_sheet_name(raw: &str) -> String {
    let c_name = raw.trim();
    if c_name.is_empty() {
        C_SHEET_NAME_DEFAULT.to_string()
    } else {
        c_name.to_string()
    }
}
