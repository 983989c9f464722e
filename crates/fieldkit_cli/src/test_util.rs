//! Shared fixtures for CLI tests.

use std::path::{Path, PathBuf};

use fieldkit_io_xlsx::{EnumCellValue, XlsxWriter};

/// Write `people.xlsx` (Name, Age, City; two rows) into `path_dir`.
pub fn write_people_workbook(path_dir: &Path) -> PathBuf {
    let path_file = path_dir.join("people.xlsx");
    let mut writer = XlsxWriter::with_defaults(path_file.clone());
    writer
        .write_sheet_from_rows(
            &["Name".to_string(), "Age".to_string(), "City".to_string()],
            &[
                vec![
                    EnumCellValue::from("Alice"),
                    EnumCellValue::Number(30.0),
                    EnumCellValue::from("NYC"),
                ],
                vec![
                    EnumCellValue::from("Bob"),
                    EnumCellValue::Number(25.0),
                    EnumCellValue::from("LA"),
                ],
            ],
            "People",
        )
        .unwrap();
    writer.close().unwrap();
    path_file
}
