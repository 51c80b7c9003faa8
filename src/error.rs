use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::model::column::CanonicalField;

#[derive(Error, Debug)]
pub enum RekapError {
    /// A required column could not be found in the header row.
    #[error("required column '{field}' not found in header")]
    MissingColumn { field: CanonicalField },

    /// Row-scoped parse failure. Never escapes the lateness strategies.
    #[error("malformed value '{value}': {reason}")]
    MalformedValue { value: String, reason: &'static str },

    #[error("no file uploaded, choose an attendance export (.xlsx or .csv)")]
    EmptyUpload,

    #[error("spreadsheet is empty or has no header row")]
    EmptySheet,

    #[error("sheet \"{0}\" not found in workbook")]
    SheetNotFound(String),

    #[error("failed to read spreadsheet: {0}")]
    Decode(String),

    #[error("unsupported file type '{0}', expected .xlsx or .csv")]
    UnsupportedFormat(String),

    #[error("failed to build export: {0}")]
    Export(String),

    #[error("no processed data found for this batch")]
    BatchNotFound,
}

pub type Result<T> = std::result::Result<T, RekapError>;

impl RekapError {
    pub fn malformed(value: impl ToString, reason: &'static str) -> Self {
        RekapError::MalformedValue {
            value: value.to_string(),
            reason,
        }
    }
}

impl From<calamine::XlsxError> for RekapError {
    fn from(e: calamine::XlsxError) -> Self {
        RekapError::Decode(e.to_string())
    }
}

impl From<csv::Error> for RekapError {
    fn from(e: csv::Error) -> Self {
        RekapError::Decode(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for RekapError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        RekapError::Export(e.to_string())
    }
}

impl ResponseError for RekapError {
    fn status_code(&self) -> StatusCode {
        match self {
            RekapError::BatchNotFound => StatusCode::NOT_FOUND,
            RekapError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
