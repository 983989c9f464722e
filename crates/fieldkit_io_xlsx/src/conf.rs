//! Workbook limits and the default cell styles.

use crate::spec::{EnumCellAlign, SpecCellFormat};

/// Rows per worksheet, header included.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Columns per worksheet.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Longest sheet name Excel accepts, in chars.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Rejected anywhere in a sheet name.
pub const TUP_EXCEL_ILLEGAL: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];
/// Fallback sheet name when sanitizing leaves nothing.
pub const C_SHEET_NAME_FALLBACK: &str = "Sheet";

/// Base text format for body cells.
pub fn derive_default_text_format() -> SpecCellFormat {
    SpecCellFormat {
        font_name: Some("Calibri".to_string()),
        font_size: Some(11),
        l_align: vec![EnumCellAlign::VCenter],
        ..Default::default()
    }
}

/// Header row format: base text format, bold, bottom border.
pub fn derive_default_header_format() -> SpecCellFormat {
    derive_default_text_format().with_(SpecCellFormat {
        bold: true,
        l_align: vec![EnumCellAlign::Center],
        if_border_bottom: true,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_format_overlays_text_format() {
        let fmt_header = derive_default_header_format();
        assert_eq!(fmt_header.font_name.as_deref(), Some("Calibri"));
        assert!(fmt_header.bold);
        assert!(fmt_header.if_border_bottom);
        assert_eq!(fmt_header.l_align.len(), 2);
        assert!(!derive_default_text_format().bold);
    }
}
