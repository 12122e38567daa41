//! Tabular file export (CSV and XLSX).
//!
//! Every exportable list defines a row type implementing `ExportRecord`. Rows are
//! already formatted for display: masks applied, dates rendered with
//! `util::date::format_export_date`.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::model::api::FileType;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Xlsx(#[from] XlsxError),
}

/// A row of an exported table.
pub trait ExportRecord {
    /// Column titles, in the order `fields` returns values.
    const HEADERS: &'static [&'static str];

    fn fields(&self) -> Vec<String>;
}

/// Generated export ready to be sent as a download.
#[derive(Debug)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

impl FileType {
    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Csv => "csv",
            FileType::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            FileType::Csv => "text/csv",
            FileType::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

/// Writes `rows` as a `{resource}.{ext}` file.
pub fn export<R: ExportRecord>(
    resource: &str,
    file_type: FileType,
    rows: &[R],
) -> Result<ExportFile, ExportError> {
    let bytes = match file_type {
        FileType::Csv => write_csv(rows)?,
        FileType::Xlsx => write_xlsx(resource, rows)?,
    };

    Ok(ExportFile {
        bytes,
        content_type: file_type.content_type(),
        filename: format!("{}.{}", resource, file_type.extension()),
    })
}

fn write_csv<R: ExportRecord>(rows: &[R]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(R::HEADERS)?;
    for row in rows {
        writer.write_record(row.fields())?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}

fn write_xlsx<R: ExportRecord>(sheet_name: &str, rows: &[R]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let bold = Format::new().set_bold();
    for (col, header) in R::HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let line = index as u32 + 1;
        for (col, value) in row.fields().iter().enumerate() {
            worksheet.write_string(line, col as u16, value)?;
        }
    }

    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

impl IntoResponse for ExportFile {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.filename),
                ),
            ],
            self.bytes,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        phone: &'static str,
    }

    impl ExportRecord for Row {
        const HEADERS: &'static [&'static str] = &["Name", "Phone"];

        fn fields(&self) -> Vec<String> {
            vec![self.name.to_string(), self.phone.to_string()]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "Acme, Inc.",
                phone: "(123) 456-7890",
            },
            Row {
                name: "Beta",
                phone: "",
            },
        ]
    }

    #[test]
    fn csv_has_header_and_quoted_rows() {
        let file = export("accounts", FileType::Csv, &rows()).unwrap();
        let text = String::from_utf8(file.bytes).unwrap();

        assert_eq!(
            text,
            "Name,Phone\n\"Acme, Inc.\",(123) 456-7890\nBeta,\n"
        );
        assert_eq!(file.filename, "accounts.csv");
        assert_eq!(file.content_type, "text/csv");
    }

    #[test]
    fn xlsx_produces_zip_container() {
        let file = export("accounts", FileType::Xlsx, &rows()).unwrap();

        // XLSX files are zip archives.
        assert_eq!(&file.bytes[..2], b"PK");
        assert_eq!(file.filename, "accounts.xlsx");
    }

    #[test]
    fn response_carries_download_headers() {
        let file = export("users", FileType::Csv, &rows()).unwrap();
        let response = file.into_response();

        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"users.csv\""
        );
    }
}
