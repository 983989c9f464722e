//! Data, style and report types shared by the reader and the writer.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Content placement inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCellAlign {
    Center,
    /// Vertical centering; combines with a horizontal alignment.
    VCenter,
}

/// Cell style, converted to `rust_xlsxwriter::Format` at write time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecCellFormat {
    pub font_name: Option<String>,
    /// Points.
    pub font_size: Option<u16>,
    pub bold: bool,
    /// Applied in order.
    pub l_align: Vec<EnumCellAlign>,
    /// Thin bottom border.
    pub if_border_bottom: bool,
}

impl SpecCellFormat {
    /// Overlay `patch` onto `self`.
    ///
    /// Set fonts in `patch` win, flags are OR-ed and alignments are appended.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        let mut l_align = self.l_align.clone();
        l_align.extend(patch.l_align);
        SpecCellFormat {
            font_name: patch.font_name.or_else(|| self.font_name.clone()),
            font_size: patch.font_size.or(self.font_size),
            bold: self.bold || patch.bold,
            l_align,
            if_border_bottom: self.if_border_bottom || patch.if_border_bottom,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValueSpecification

/// Normalized cell value shared by the reader, the tabular store and the writer.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// No cell at this position.
    None,
    /// Text value. Empty source cells are read as empty text.
    String(String),
    /// Numeric value (dates are kept as their serial number).
    Number(f64),
    /// Boolean value.
    Boolean(bool),
}

impl EnumCellValue {
    /// True for `None` and empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            EnumCellValue::None => true,
            EnumCellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Display text: blanks render as empty text, numbers in shortest form.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EnumCellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumCellValue::None => Ok(()),
            EnumCellValue::String(s) => write!(f, "{s}"),
            EnumCellValue::Number(n) => write!(f, "{n}"),
            EnumCellValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        EnumCellValue::String(value.to_string())
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        EnumCellValue::Number(value)
    }
}

/// First-sheet content: normalized header row plus data rows.
///
/// Rows are interpreted against `headers` by position and may be shorter than it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSheetTable {
    /// Trimmed header texts from the first row.
    pub headers: Vec<String>,
    /// Data rows below the header row.
    pub rows: Vec<Vec<EnumCellValue>>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Column widths derived from the header text, padded and clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumnWidthPolicy {
    pub n_width_min: usize,
    pub n_width_max: usize,
    pub n_padding: usize,
}

impl Default for SpecColumnWidthPolicy {
    fn default() -> Self {
        Self {
            n_width_min: 8,
            n_width_max: 60,
            n_padding: 2,
        }
    }
}

impl SpecColumnWidthPolicy {
    /// Reject bounds that leave no valid width.
    pub fn validate(&self) -> Result<(), XlsxIoError> {
        if self.n_width_min == 0 || self.n_width_max < self.n_width_min {
            return Err(XlsxIoError::InvalidInput(format!(
                "column width bounds {}..={} are empty",
                self.n_width_min, self.n_width_max
            )));
        }
        Ok(())
    }

    /// Final width for a header measured at `n_header` units.
    pub fn derive_width(&self, n_header: usize) -> usize {
        let n_max = self.n_width_max.min(255).max(self.n_width_min);
        (n_header + self.n_padding).clamp(self.n_width_min, n_max)
    }
}

/// Options shared by every sheet of one writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    pub policy_width: SpecColumnWidthPolicy,
    pub if_freeze_header: bool,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            policy_width: SpecColumnWidthPolicy::default(),
            if_freeze_header: true,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetSpecification

/// One worksheet of a write call: its final name and the data rows it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetSlice {
    pub sheet_name: String,
    /// First data row (inclusive).
    pub row_start: usize,
    /// End data row (exclusive).
    pub row_end: usize,
}

/// What one `write_sheet_from_rows` call produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    pub sheets: Vec<SpecSheetSlice>,
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Import/export failures.
#[derive(Debug, Error)]
pub enum XlsxIoError {
    /// Source file could not be read from disk.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Bytes are not a readable `.xlsx` workbook.
    #[error("failed to parse `.xlsx`: {0}")]
    Parse(#[from] calamine::XlsxError),
    /// Workbook serialization failed.
    #[error("xlsx write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    /// Caller passed data the writer cannot represent.
    #[error("{0}")]
    InvalidInput(String),
    /// Write attempted on a writer that already flushed to disk.
    #[error("workbook already saved; no further sheets can be added")]
    Closed,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_value_text_rendering() {
        assert_eq!(EnumCellValue::None.to_text(), "");
        assert_eq!(EnumCellValue::from("NYC").to_text(), "NYC");
        assert_eq!(EnumCellValue::Number(30.0).to_text(), "30");
        assert_eq!(EnumCellValue::Number(3.5).to_text(), "3.5");
        assert_eq!(EnumCellValue::Boolean(true).to_text(), "true");
    }

    #[test]
    fn blank_covers_none_and_empty_text() {
        assert!(EnumCellValue::None.is_blank());
        assert!(EnumCellValue::from("").is_blank());
        assert!(!EnumCellValue::Number(0.0).is_blank());
    }

    #[test]
    fn width_policy_pads_and_clamps() {
        let mut policy = SpecColumnWidthPolicy::default();
        assert_eq!(policy.derive_width(2), 8);
        assert_eq!(policy.derive_width(10), 12);
        assert_eq!(policy.derive_width(100), 60);
        assert!(policy.validate().is_ok());
        policy.n_width_max = 4;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn overlay_keeps_base_and_appends_alignment() {
        let fmt_base = SpecCellFormat {
            font_size: Some(11),
            l_align: vec![EnumCellAlign::VCenter],
            ..Default::default()
        };
        let fmt_overlay = fmt_base.with_(SpecCellFormat {
            bold: true,
            font_size: Some(12),
            l_align: vec![EnumCellAlign::Center],
            ..Default::default()
        });
        assert_eq!(fmt_overlay.font_size, Some(12));
        assert!(fmt_overlay.bold);
        assert_eq!(
            fmt_overlay.l_align,
            vec![EnumCellAlign::VCenter, EnumCellAlign::Center]
        );
        assert!(!fmt_base.bold);
    }
}
