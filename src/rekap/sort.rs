use std::cmp::Ordering;

use serde::Deserialize;
use utoipa::ToSchema;

use crate::model::attendance::AttendanceRecord;
use crate::model::cell::Cell;

/// Stable sort by lowercased name, then date text. Missing dates compare as
/// the empty string and therefore come first.
pub fn sort_records(records: &mut [AttendanceRecord]) {
    records.sort_by_cached_key(|r| (r.employee_name.to_lowercase(), r.date.to_string()));
}

/// Column a preview can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    EmployeeName,
    Date,
    CheckIn,
    CheckOut,
    LateIndicator,
    EarlyOut,
    LateMinutes,
    TotalLateCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

// numbers compare numerically, everything else by its displayed text
fn cmp_cells(a: &Cell, b: &Cell) -> Ordering {
    match (a, b) {
        (Cell::Number(x), Cell::Number(y)) => x.total_cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn cmp_by(key: SortKey, a: &AttendanceRecord, b: &AttendanceRecord) -> Ordering {
    match key {
        SortKey::EmployeeName => a.employee_name.cmp(&b.employee_name),
        SortKey::Date => cmp_cells(&a.date, &b.date),
        SortKey::CheckIn => cmp_cells(&a.check_in, &b.check_in),
        SortKey::CheckOut => cmp_cells(&a.check_out, &b.check_out),
        SortKey::LateIndicator => cmp_cells(&a.late_indicator_raw, &b.late_indicator_raw),
        SortKey::EarlyOut => cmp_cells(&a.early_out, &b.early_out),
        SortKey::LateMinutes => a.late_minutes.cmp(&b.late_minutes),
        SortKey::TotalLateCount => a.total_late_count.cmp(&b.total_late_count),
    }
}

/// Stable re-order by one column. Equal rows keep their relative order in
/// both directions.
pub fn sort_by_column(records: &mut [AttendanceRecord], key: SortKey, dir: SortDirection) {
    records.sort_by(|a, b| match dir {
        SortDirection::Asc => cmp_by(key, a, b),
        SortDirection::Desc => cmp_by(key, b, a),
    });
}
