use chrono::NaiveTime;
use tracing::trace;

use crate::model::attendance::AttendanceRecord;
use crate::model::cell::Cell;
use crate::model::column::{CanonicalField, ColumnMap};
use crate::rekap::lateness::{LatenessStrategy, cell_at, minutes_after, parse_time_of_day, schedule_or};

#[derive(Debug, Default)]
pub struct Normalized {
    /// Late rows in input order; `total_late_count` is still 0.
    pub records: Vec<AttendanceRecord>,
    pub rows_read: usize,
    pub skipped_names: usize,
    pub skipped_on_time: usize,
}

/// Trimmed, whitespace-collapsed employee name. Blank and "nan" are rejected.
pub fn clean_name(cell: &Cell) -> Option<String> {
    if matches!(cell, Cell::Empty) {
        return None;
    }

    let name = cell.to_string().split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() || name.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(name)
    }
}

/// Raw "Early Out" cell when that column exists, otherwise the minutes the
/// check-out precedes the scheduled end.
fn early_out(row: &[Cell], map: &ColumnMap, default_end: NaiveTime) -> Cell {
    if let Some(idx) = map.get(CanonicalField::EarlyOut) {
        return cell_at(row, Some(idx)).clone();
    }

    let Some(out_idx) = map.get(CanonicalField::CheckOut) else {
        return Cell::Empty;
    };

    match parse_time_of_day(cell_at(row, Some(out_idx))) {
        Ok(check_out) => {
            let end = schedule_or(cell_at(row, map.get(CanonicalField::ScheduleOut)), default_end);
            Cell::Number(minutes_after(end, check_out) as f64)
        }
        Err(_) => Cell::Empty,
    }
}

pub fn normalize<I, R>(
    rows: I,
    map: &ColumnMap,
    strategy: &LatenessStrategy,
    default_end: NaiveTime,
) -> Normalized
where
    I: IntoIterator<Item = R>,
    R: AsRef<[Cell]>,
{
    let mut out = Normalized::default();
    let name_idx = map.get(CanonicalField::FullName);

    for (line, row) in rows.into_iter().enumerate() {
        let row = row.as_ref();
        out.rows_read += 1;

        let Some(employee_name) = clean_name(cell_at(row, name_idx)) else {
            trace!(line, "Skipping row without employee name");
            out.skipped_names += 1;
            continue;
        };

        let late_minutes = strategy.late_minutes(row);
        if late_minutes == 0 {
            out.skipped_on_time += 1;
            continue;
        }

        let field = |f: CanonicalField| cell_at(row, map.get(f)).clone();

        out.records.push(AttendanceRecord {
            employee_name,
            date: field(CanonicalField::Date),
            check_in: field(CanonicalField::CheckIn),
            check_out: field(CanonicalField::CheckOut),
            late_indicator_raw: field(CanonicalField::LateIndicator),
            early_out: early_out(row, map, default_end),
            late_minutes,
            total_late_count: 0,
        });
    }

    out
}
