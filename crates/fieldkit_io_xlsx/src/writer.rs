//! XLSX writer kernel that turns header + row tables into workbook output.

use std::collections::BTreeSet;
use std::path::PathBuf;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::conf::{derive_default_header_format, derive_default_text_format};
use crate::spec::{
    EnumCellAlign, EnumCellValue, SpecCellFormat, SpecSheetSlice, SpecXlsxReport,
    SpecXlsxWriteOptions, XlsxIoError,
};
use crate::util::{
    derive_suffixed_sheet_name, plan_sheet_slices, sanitize_sheet_name, validate_unique_columns,
};

/// Workbook under construction, saved to `path_file_out` on [`XlsxWriter::close`].
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    fmt_text: SpecCellFormat,
    fmt_header: SpecCellFormat,
    write_options: SpecXlsxWriteOptions,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxWriter {
    pub fn new(
        path_file_out: PathBuf,
        fmt_text: SpecCellFormat,
        fmt_header: SpecCellFormat,
        write_options: SpecXlsxWriteOptions,
    ) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            fmt_text,
            fmt_header,
            write_options,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Calibri body cells, bold bordered header, header-based widths.
    pub fn with_defaults(path_file_out: PathBuf) -> Self {
        Self::new(
            path_file_out,
            derive_default_text_format(),
            derive_default_header_format(),
            SpecXlsxWriteOptions::default(),
        )
    }

    /// One report per sheet-writing call, in call order.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Save to disk once; later calls do nothing.
    pub fn close(&mut self) -> Result<(), XlsxIoError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        tracing::info!(path = %self.path_file_out.display(), "workbook saved");
        Ok(())
    }

    /// Serialize the buffered workbook without touching disk.
    pub fn save_to_buffer(&mut self) -> Result<Vec<u8>, XlsxIoError> {
        Ok(self.workbook.save_to_buffer()?)
    }

    /// Write one sheet: `headers` as the first row, then `rows` cell by cell.
    ///
    /// Rows shorter than `headers` leave trailing cells blank; extra cells are ignored.
    pub fn write_sheet_from_rows(
        &mut self,
        headers: &[String],
        rows: &[Vec<EnumCellValue>],
        sheet_name: &str,
    ) -> Result<(), XlsxIoError> {
        if self.if_closed {
            return Err(XlsxIoError::Closed);
        }
        let policy_width = self.write_options.policy_width.clone();
        policy_width.validate()?;
        validate_unique_columns(headers)?;

        let n_width = headers.len();

        let mut report = SpecXlsxReport::default();
        let l_slices = plan_sheet_slices(
            rows.len(),
            n_width,
            &sanitize_sheet_name(sheet_name, '_'),
            &mut report,
        )?;

        let fmt_header = derive_rust_xlsx_format(&self.fmt_header);
        let fmt_text = derive_rust_xlsx_format(&self.fmt_text);
        let l_width_col: Vec<f64> = headers
            .iter()
            .map(|c_header| policy_width.derive_width(estimate_text_width(c_header)) as f64)
            .collect();

        for slice in l_slices {
            let sheet_name_unique = self.derive_unique_sheet_name(&slice.sheet_name);
            let worksheet = self.workbook.add_worksheet();
            worksheet.set_name(&sheet_name_unique)?;

            for (n_idx_col, c_header) in headers.iter().enumerate() {
                worksheet.write_string_with_format(0, cast_col_num(n_idx_col)?, c_header, &fmt_header)?;
            }
            if self.write_options.if_freeze_header {
                worksheet.set_freeze_panes(1, 0)?;
            }

            for (n_idx_col, n_width_col) in l_width_col.iter().enumerate() {
                worksheet.set_column_width(cast_col_num(n_idx_col)?, *n_width_col)?;
            }
            for (n_row_local, row) in rows[slice.row_start..slice.row_end].iter().enumerate() {
                for n_idx_col in 0..n_width {
                    let value = row.get(n_idx_col).unwrap_or(&EnumCellValue::None);
                    write_cell_with_format(worksheet, 1 + n_row_local, n_idx_col, value, &fmt_text)?;
                }
            }

            tracing::debug!(
                sheet = %sheet_name_unique,
                n_rows = slice.row_end - slice.row_start,
                n_cols = n_width,
                "sheet written"
            );
            report.sheets.push(SpecSheetSlice {
                sheet_name: sheet_name_unique,
                ..slice
            });
        }

        for c_warning in &report.warnings {
            tracing::warn!("{c_warning}");
        }
        self.l_reports.push(report);
        Ok(())
    }

    /// `name`, or `name (2)`, `name (3)`, ... when already used in this workbook.
    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        let c_name = (1usize..)
            .map(|n_copy| match n_copy {
                1 => name.to_string(),
                _ => derive_suffixed_sheet_name(name, &format!(" ({n_copy})")),
            })
            .find(|c_candidate| !self.set_sheet_names_existing.contains(c_candidate))
            .unwrap_or_else(|| name.to_string());
        self.set_sheet_names_existing.insert(c_name.clone());
        c_name
    }
}

/// Approximate column units `text` occupies; wide scripts count 1.6 per char.
fn estimate_text_width(text: &str) -> usize {
    let n_ascii = text.chars().filter(|chr| chr.is_ascii()).count();
    let n_wide = text.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_wide as f64 * 1.6).round() as usize
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), XlsxIoError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::String(val) if !value.is_blank() => {
            worksheet.write_string_with_format(n_row, n_col, val, format)?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, format)?;
        }
        EnumCellValue::Boolean(val) => {
            worksheet.write_boolean_with_format(n_row, n_col, *val, format)?;
        }
        EnumCellValue::String(_) | EnumCellValue::None => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(style: &SpecCellFormat) -> Format {
    let mut format = Format::new();
    if let Some(c_font) = &style.font_name {
        format = format.set_font_name(c_font.as_str());
    }
    if let Some(n_size) = style.font_size {
        format = format.set_font_size(f64::from(n_size));
    }
    if style.bold {
        format = format.set_bold();
    }
    for align in &style.l_align {
        format = format.set_align(match align {
            EnumCellAlign::Center => FormatAlign::Center,
            EnumCellAlign::VCenter => FormatAlign::VerticalCenter,
        });
    }
    if style.if_border_bottom {
        format = format.set_border_bottom(FormatBorder::Thin);
    }
    format
}

fn cast_row_num(value: usize) -> Result<u32, XlsxIoError> {
    u32::try_from(value)
        .map_err(|_| XlsxIoError::InvalidInput(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, XlsxIoError> {
    u16::try_from(value)
        .map_err(|_| XlsxIoError::InvalidInput(format!("column index overflow: {value}")))
}
