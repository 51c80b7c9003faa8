use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Serialize, Serializer};

/// A single decoded spreadsheet value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Spreadsheet serial (days since 1899-12-30, fraction = time of day)
    /// to a typed cell.
    pub fn from_excel_serial(serial: f64) -> Self {
        let Some(epoch) = NaiveDate::from_ymd_opt(1899, 12, 30) else {
            return Cell::Number(serial);
        };

        let days = serial.trunc() as i64;
        let seconds = ((serial - serial.trunc()) * 86_400.0).round() as u32;
        let Some(time) = NaiveTime::from_num_seconds_from_midnight_opt(seconds.min(86_399), 0)
        else {
            return Cell::Number(serial);
        };

        if days == 0 {
            return Cell::Time(time);
        }

        let Some(offset) = chrono::Duration::try_days(days) else {
            return Cell::Number(serial);
        };
        match epoch.checked_add_signed(offset) {
            Some(date) if seconds == 0 => Cell::Date(date),
            Some(date) => Cell::DateTime(date.and_time(time)),
            None => Cell::Number(serial),
        }
    }
}

fn write_time(f: &mut fmt::Formatter<'_>, t: &NaiveTime) -> fmt::Result {
    if t.second() == 0 {
        write!(f, "{}", t.format("%H:%M"))
    } else {
        write!(f, "{}", t.format("%H:%M:%S"))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Time(t) => write_time(f, t),
            Cell::DateTime(dt) => {
                write!(f, "{} ", dt.date().format("%Y-%m-%d"))?;
                write_time(f, &dt.time())
            }
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_none(),
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::Bool(b) => serializer.serialize_bool(*b),
            other => serializer.collect_str(other),
        }
    }
}
