//! `fieldkit_io_xlsx` v1:
//! Rust-side XLSX import/export adapter for column extraction.
//!
//! Module layout:
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/options/errors
//! - `util`   : pure helper functions
//! - `reader` : first-sheet reader (headers + data rows)
//! - `writer` : buffered workbook writer kernel
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
pub use reader::{read_first_sheet, read_first_sheet_from_bytes};
pub use spec::{
    EnumCellAlign, EnumCellValue, SpecCellFormat, SpecColumnWidthPolicy,
    SpecSheetSlice, SpecSheetTable, SpecXlsxReport, SpecXlsxWriteOptions, XlsxIoError,
};
pub use util::{
    derive_suffixed_sheet_name, normalize_header, plan_sheet_slices, sanitize_sheet_name,
    validate_unique_columns,
};
pub use writer::XlsxWriter;
