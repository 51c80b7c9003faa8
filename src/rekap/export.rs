use crate::model::attendance::{AttendanceRecord, Batch};
use crate::model::cell::Cell;

pub const EXPORT_HEADER: [&str; 8] = [
    "Full Name",
    "Total Late Count",
    "Date",
    "Check In",
    "Check Out",
    "Late In",
    "Late Minutes",
    "Early Out",
];

/// Header plus one row per record, ready for a spreadsheet writer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

fn export_row(r: &AttendanceRecord) -> Vec<Cell> {
    vec![
        Cell::text(r.employee_name.as_str()),
        Cell::Number(r.total_late_count as f64),
        r.date.clone(),
        r.check_in.clone(),
        r.check_out.clone(),
        r.late_indicator_raw.clone(),
        Cell::Number(r.late_minutes as f64),
        r.early_out.clone(),
    ]
}

/// Full batch in its stored order. No filtering or paging here.
pub fn export_table(batch: &Batch) -> ExportTable {
    ExportTable {
        header: EXPORT_HEADER.iter().map(|h| h.to_string()).collect(),
        rows: batch.records.iter().map(export_row).collect(),
    }
}
