//! Spreadsheet decoding (upload) and encoding (download).

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{RekapError, Result};
use crate::model::cell::Cell;
use crate::rekap::ExportTable;

pub const EXPORT_SHEET_NAME: &str = "Rekap Telat";
pub const EXPORT_FILE_STEM: &str = "rekap_semua_telat_clean";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SheetFormat {
    Xlsx,
    Csv,
}

impl SheetFormat {
    /// Pick the format from the file name extension, then the content type.
    /// Defaults to xlsx when neither says anything.
    pub fn detect(filename: Option<&str>, content_type: Option<&str>) -> Result<Self> {
        if let Some(name) = filename.filter(|n| !n.trim().is_empty()) {
            let ext = Path::new(name.trim())
                .extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_default();
            return match ext.as_str() {
                "xlsx" => Ok(SheetFormat::Xlsx),
                "csv" => Ok(SheetFormat::Csv),
                _ => Err(RekapError::UnsupportedFormat(ext)),
            };
        }

        match content_type {
            Some(ct) if ct.starts_with("text/csv") => Ok(SheetFormat::Csv),
            _ => Ok(SheetFormat::Xlsx),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            SheetFormat::Xlsx => "xlsx",
            SheetFormat::Csv => "csv",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            SheetFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            SheetFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSheet {
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

pub fn cell_from_data(cell: &Data) -> Cell {
    match cell {
        Data::String(v) => Cell::from(v.as_str()),
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Bool(v) => Cell::Bool(*v),
        Data::DateTime(v) => Cell::from_excel_serial(v.as_f64()),
        Data::DateTimeIso(v) => Cell::from(v.as_str()),
        Data::DurationIso(v) => Cell::from(v.as_str()),
        Data::Error(v) => Cell::text(format!("#{v:?}")),
        Data::Empty => Cell::Empty,
    }
}

fn split_header(mut rows: Vec<Vec<Cell>>) -> Result<DecodedSheet> {
    if rows.is_empty() {
        return Err(RekapError::EmptySheet);
    }
    let header = rows.remove(0);
    Ok(DecodedSheet { header, rows })
}

/// Named sheet when given, otherwise the first one in the workbook.
fn decode_xlsx(bytes: &[u8], sheet: Option<&str>) -> Result<DecodedSheet> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;

    let name = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|n| n == name) {
                return Err(RekapError::SheetNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(RekapError::EmptySheet)?,
    };

    let range = workbook.worksheet_range(&name)?;
    let rows = range
        .rows()
        .map(|r| r.iter().map(cell_from_data).collect())
        .collect();

    split_header(rows)
}

fn decode_csv(bytes: &[u8]) -> Result<DecodedSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from).collect::<Vec<_>>());
    }

    // Excel writes a BOM in front of UTF-8 CSV exports.
    if let Some(Cell::Text(first)) = rows.first_mut().and_then(|r| r.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    split_header(rows)
}

pub fn decode(bytes: &[u8], format: SheetFormat, sheet: Option<&str>) -> Result<DecodedSheet> {
    match format {
        SheetFormat::Xlsx => decode_xlsx(bytes, sheet),
        SheetFormat::Csv => decode_csv(bytes),
    }
}

fn encode_xlsx(table: &ExportTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, title) in table.header.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, title, &header_format)?;
    }

    for (idx, row) in table.rows.iter().enumerate() {
        let r = idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                other => {
                    worksheet.write_string(r, c, other.to_string())?;
                }
            }
        }
    }
    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

fn encode_csv(table: &ExportTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|c| c.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| RekapError::Export(e.to_string()))
}

pub fn encode(table: &ExportTable, format: SheetFormat) -> Result<Vec<u8>> {
    match format {
        SheetFormat::Xlsx => encode_xlsx(table),
        SheetFormat::Csv => encode_csv(table),
    }
}
