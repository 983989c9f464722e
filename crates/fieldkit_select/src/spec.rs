//! Selection/session models, reports and errors.

use std::fmt;
use std::path::PathBuf;

use fieldkit_io_xlsx::EnumCellValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conf::C_HISTORY_SIGNATURE_SEP;

////////////////////////////////////////////////////////////////////////////////
// #region SelectionReports

/// Outcome of one `add` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecAddReport {
    /// Names appended to the selection.
    pub cnt_added: usize,
    /// Names not matching any header, or already selected.
    pub cnt_skipped: usize,
}

impl SpecAddReport {
    /// True when the call touched at least one candidate.
    pub fn is_noteworthy(&self) -> bool {
        self.cnt_added > 0 || self.cnt_skipped > 0
    }
}

impl fmt::Display for SpecAddReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added {}, skipped {} (unknown or duplicate)",
            self.cnt_added, self.cnt_skipped
        )
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PreviewTable

/// Rendered preview: column labels plus at most a handful of text rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecPreviewTable {
    /// Column labels in display order.
    pub headers: Vec<String>,
    /// Cell texts, one inner vector per previewed row.
    pub rows: Vec<Vec<String>>,
}

impl SpecPreviewTable {
    /// True when there is nothing to display.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl fmt::Display for SpecPreviewTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut l_widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (n_idx_col, c_cell) in row.iter().enumerate() {
                if let Some(n_width) = l_widths.get_mut(n_idx_col) {
                    *n_width = usize::max(*n_width, c_cell.chars().count());
                }
            }
        }

        let write_line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let c_line = cells
                .iter()
                .zip(&l_widths)
                .map(|(c_cell, n_width)| {
                    let n_pad = n_width.saturating_sub(c_cell.chars().count());
                    format!("{c_cell}{}", " ".repeat(n_pad))
                })
                .collect::<Vec<_>>()
                .join(" | ");
            writeln!(f, "{}", c_line.trim_end())
        };

        write_line(f, &self.headers)?;
        let c_rule = l_widths
            .iter()
            .map(|n_width| "-".repeat(*n_width))
            .collect::<Vec<_>>()
            .join("-+-");
        writeln!(f, "{c_rule}")?;
        for row in &self.rows {
            write_line(f, row)?;
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HistorySpecification

/// One persisted column-selection preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecHistoryEntry {
    /// Display name (input file stem by default).
    pub name: String,
    /// Selected columns in export order.
    pub columns: Vec<String>,
    /// Save time, milliseconds since the Unix epoch.
    pub ts: i64,
}

impl SpecHistoryEntry {
    /// Order-sensitive signature used for de-duplication.
    pub fn signature(&self) -> String {
        self.columns.join(C_HISTORY_SIGNATURE_SEP)
    }

    /// List label: `name · col1, col2`.
    pub fn label(&self) -> String {
        format!("{} · {}", self.name, self.columns.join(", "))
    }
}

/// Preset storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend file could not be read or written.
    #[error("storage io error at {}: {source}", path.display())]
    Io {
        /// Backend file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Entry list could not be serialized.
    #[error("failed to serialize presets: {0}")]
    Serialize(#[from] serde_json::Error),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SessionSpecification

/// Severity of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumStatusLevel {
    /// Progress or success note.
    #[default]
    Info,
    /// Rejected request (nothing changed).
    Warn,
    /// Failed operation.
    Error,
}

/// User-visible status line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecStatus {
    /// Message text.
    pub text: String,
    /// Severity.
    pub level: EnumStatusLevel,
}

impl fmt::Display for SpecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c_tag = match self.level {
            EnumStatusLevel::Info => "info",
            EnumStatusLevel::Warn => "warn",
            EnumStatusLevel::Error => "error",
        };
        write!(f, "[{c_tag}] {}", self.text)
    }
}

/// Everything needed to write the exported workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecExportPlan {
    /// Output file name (`<stem>-extracted.xlsx`).
    pub file_name: String,
    /// Output sheet name.
    pub sheet_name: String,
    /// Header row: the selection, in order.
    pub headers: Vec<String>,
    /// Source rows projected onto the selection.
    pub rows: Vec<Vec<EnumCellValue>>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
