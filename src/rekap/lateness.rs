use chrono::{NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::error::{RekapError, Result};
use crate::model::attendance::StrategyKind;
use crate::model::cell::Cell;
use crate::model::column::{CanonicalField, ColumnMap};

static CLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2}):(\d{2})(?::(\d{2}))?").expect("clock pattern is valid"));

/// How a row's late minutes are derived. Picked once per sheet from the
/// columns that resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum LatenessStrategy {
    DirectIndicator {
        column: usize,
    },
    ScheduleDelta {
        check_in: Option<usize>,
        schedule_in: Option<usize>,
        default_start: NaiveTime,
    },
}

impl LatenessStrategy {
    pub fn select(map: &ColumnMap, default_start: NaiveTime) -> Self {
        match map.get(CanonicalField::LateIndicator) {
            Some(column) => LatenessStrategy::DirectIndicator { column },
            None => LatenessStrategy::ScheduleDelta {
                check_in: map.get(CanonicalField::CheckIn),
                schedule_in: map.get(CanonicalField::ScheduleIn),
                default_start,
            },
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            LatenessStrategy::DirectIndicator { .. } => StrategyKind::DirectIndicator,
            LatenessStrategy::ScheduleDelta { .. } => StrategyKind::ScheduleDelta,
        }
    }

    /// Late minutes for one row. Malformed cells read as not late.
    pub fn late_minutes(&self, row: &[Cell]) -> u32 {
        let result = match self {
            LatenessStrategy::DirectIndicator { column } => {
                parse_late_indicator(cell_at(row, Some(*column)))
            }
            LatenessStrategy::ScheduleDelta {
                check_in,
                schedule_in,
                default_start,
            } => parse_time_of_day(cell_at(row, *check_in)).map(|actual| {
                let start = schedule_or(cell_at(row, *schedule_in), *default_start);
                minutes_after(actual, start)
            }),
        };

        result.unwrap_or_else(|e| {
            trace!(error = %e, "Treating malformed lateness value as on time");
            0
        })
    }
}

static EMPTY: Cell = Cell::Empty;

pub(crate) fn cell_at(row: &[Cell], idx: Option<usize>) -> &Cell {
    idx.and_then(|i| row.get(i)).unwrap_or(&EMPTY)
}

/// Scheduled time from the row, falling back to the configured default
/// when the cell is absent or unparseable.
pub(crate) fn schedule_or(cell: &Cell, default: NaiveTime) -> NaiveTime {
    parse_time_of_day(cell).unwrap_or(default)
}

/// Parse a "late in" cell into minutes.
///
/// Accepted forms, in order: blank (0), `H:M`, plain digits, and free text
/// from which all digits are taken (`"T+5"` is 5). A time-typed cell is
/// read as hours and minutes regardless of its seconds.
pub fn parse_late_indicator(cell: &Cell) -> Result<u32> {
    // typed times are a duration; seconds are dropped
    if let Cell::Time(t) = cell {
        return Ok(t.hour() * 60 + t.minute());
    }

    let raw = cell.to_string();
    let s = raw.trim();
    if s.is_empty() {
        return Ok(0);
    }

    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        let [h, m] = parts.as_slice() else {
            return Err(RekapError::malformed(s, "expected H:M"));
        };
        let h: i64 = h
            .trim()
            .parse()
            .map_err(|_| RekapError::malformed(s, "hours are not numeric"))?;
        let m: i64 = m
            .trim()
            .parse()
            .map_err(|_| RekapError::malformed(s, "minutes are not numeric"))?;
        let total = h
            .checked_mul(60)
            .and_then(|v| v.checked_add(m))
            .ok_or_else(|| RekapError::malformed(s, "out of range"))?;
        return Ok(u32::try_from(total.max(0)).unwrap_or(0));
    }

    let digits: String = s.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Ok(0);
    }

    digits
        .parse()
        .map_err(|_| RekapError::malformed(s, "out of range"))
}

/// Time of day from a cell: typed times, date-times, day fractions, or
/// text containing `H:MM[:SS]`.
pub fn parse_time_of_day(cell: &Cell) -> Result<NaiveTime> {
    match cell {
        Cell::Time(t) => Ok(*t),
        Cell::DateTime(dt) => Ok(dt.time()),
        Cell::Number(n) if n.is_finite() && *n >= 0.0 => {
            let seconds = ((n - n.floor()) * 86_400.0).round() as u32 % 86_400;
            NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
                .ok_or_else(|| RekapError::malformed(n, "not a day fraction"))
        }
        Cell::Text(s) => {
            let caps = CLOCK
                .captures(s)
                .ok_or_else(|| RekapError::malformed(s, "no time found"))?;
            let field = |i: usize| -> u32 {
                caps.get(i)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or(0)
            };
            NaiveTime::from_hms_opt(field(1), field(2), field(3))
                .ok_or_else(|| RekapError::malformed(s, "time out of range"))
        }
        other => Err(RekapError::malformed(other, "not a time of day")),
    }
}

/// Whole minutes `actual` is past `reference`, truncated; 0 if not after.
pub fn minutes_after(actual: NaiveTime, reference: NaiveTime) -> u32 {
    let diff = actual.num_seconds_from_midnight() as i64 - reference.num_seconds_from_midnight() as i64;
    if diff > 0 { (diff / 60) as u32 } else { 0 }
}
