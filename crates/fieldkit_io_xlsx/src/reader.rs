//! First-sheet `.xlsx` reader: header row plus data rows.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};

use crate::spec::{EnumCellValue, SpecSheetTable, XlsxIoError};
use crate::util::normalize_header;

/// Read the first worksheet of the workbook at `path`.
pub fn read_first_sheet<P: AsRef<Path>>(path: P) -> Result<SpecSheetTable, XlsxIoError> {
    let path = path.as_ref();
    let v_bytes = fs::read(path).map_err(|source| XlsxIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_first_sheet_from_bytes(&v_bytes)
}

/// Read the first worksheet from in-memory workbook bytes.
///
/// The first row becomes the trimmed header list; every following row is kept
/// as data. Empty cells are read as empty text. A workbook without sheets, or
/// with an empty first sheet, yields an empty table.
pub fn read_first_sheet_from_bytes(v_bytes: &[u8]) -> Result<SpecSheetTable, XlsxIoError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(v_bytes))?;

    let Some(res_range) = workbook.worksheet_range_at(0) else {
        tracing::debug!("workbook has no worksheets");
        return Ok(SpecSheetTable::default());
    };
    let range = res_range?;

    let mut it_rows = range.rows();
    let headers: Vec<String> = it_rows
        .next()
        .map(|row| row.iter().map(derive_header_text_from_data).collect())
        .unwrap_or_default();
    let rows: Vec<Vec<EnumCellValue>> = it_rows
        .map(|row| row.iter().map(derive_cell_value_from_data).collect())
        .collect();

    tracing::debug!(n_cols = headers.len(), n_rows = rows.len(), "read first sheet");
    Ok(SpecSheetTable { headers, rows })
}

fn derive_header_text_from_data(value: &Data) -> String {
    normalize_header(&derive_cell_value_from_data(value).to_text())
}

fn derive_cell_value_from_data(value: &Data) -> EnumCellValue {
    match value {
        Data::Empty => EnumCellValue::String(String::new()),
        Data::String(val) => EnumCellValue::String(val.clone()),
        Data::Int(val) => EnumCellValue::Number(*val as f64),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::Bool(val) => EnumCellValue::Boolean(*val),
        Data::DateTime(val) => EnumCellValue::Number(val.as_f64()),
        Data::DateTimeIso(val) => EnumCellValue::String(val.clone()),
        Data::DurationIso(val) => EnumCellValue::String(val.clone()),
        Data::Error(err) => EnumCellValue::String(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use rust_xlsxwriter::Workbook;

    use super::*;

    fn build_workbook_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "  Name ").unwrap();
        worksheet.write_string(0, 1, "Age").unwrap();
        worksheet.write_number(0, 2, 2024).unwrap();
        worksheet.write_string(1, 0, "Alice").unwrap();
        worksheet.write_number(1, 1, 30).unwrap();
        worksheet.write_string(1, 2, "x").unwrap();
        worksheet.write_string(2, 0, "Bob").unwrap();
        worksheet.write_boolean(2, 1, true).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn reads_trimmed_headers_and_typed_rows() {
        let table = read_first_sheet_from_bytes(&build_workbook_bytes()).unwrap();

        assert_eq!(table.headers, vec!["Name", "Age", "2024"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[0],
            vec![
                EnumCellValue::from("Alice"),
                EnumCellValue::Number(30.0),
                EnumCellValue::from("x"),
            ]
        );
        assert_eq!(table.rows[1][1], EnumCellValue::Boolean(true));
        assert_eq!(table.rows[1][2], EnumCellValue::from(""));
    }

    #[test]
    fn rejects_non_workbook_bytes() {
        let res = read_first_sheet_from_bytes(b"Name,Age\nAlice,30\n");
        assert!(matches!(res, Err(XlsxIoError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = read_first_sheet(dir.path().join("absent.xlsx"));
        assert!(matches!(res, Err(XlsxIoError::Io { .. })));
    }
}
