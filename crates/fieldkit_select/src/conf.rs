//! Selection/session constants.

/// Preview shows at most this many data rows.
pub const N_PREVIEW_ROWS_MAX: usize = 5;
/// Autocomplete shows at most this many suggestions.
pub const N_SUGGEST_ITEMS_MAX: usize = 20;
/// History keeps at most this many presets.
pub const N_HISTORY_ENTRIES_MAX: usize = 20;

/// Storage key for the persisted preset list.
pub const C_HISTORY_KEY: &str = "excel_field_extract_histories_v1";
/// Separator used to build the order-sensitive column signature of a preset.
pub const C_HISTORY_SIGNATURE_SEP: &str = "|";
/// Preset name used when neither a name nor a file stem is available.
pub const C_HISTORY_NAME_DEFAULT: &str = "untitled";

/// File stem used when the input name is empty after stripping `.xlsx`.
pub const C_FILE_STEM_DEFAULT: &str = "data";
/// Suffix appended to the input stem for the exported file.
pub const C_EXPORT_FILE_SUFFIX: &str = "-extracted";
/// Extension of both the input and exported workbooks.
pub const C_XLSX_EXTENSION: &str = ".xlsx";
/// Output sheet name when the user leaves it blank.
pub const C_SHEET_NAME_DEFAULT: &str = "Extracted";

/// Delimiters splitting the free-text column input into names.
pub const C_PATTERN_INPUT_DELIMITERS: &str = r"[,，\n\t;\s]+";
/// Delimiters separating complete tokens from the trailing partial token.
pub const C_PATTERN_TOKEN_DELIMITERS: &str = r"[,，\n\t;]+";
