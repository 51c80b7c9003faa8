use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::cell::Cell;

/// One late event. Non-late rows never become records.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "employee_name": "Alice",
    "date": "2024-01-01",
    "check_in": "08:10",
    "check_out": "17:00",
    "late_indicator_raw": "10",
    "early_out": null,
    "late_minutes": 10,
    "total_late_count": 1
}))]
pub struct AttendanceRecord {
    pub employee_name: String,

    #[schema(value_type = Option<String>)]
    pub date: Cell,

    #[schema(value_type = Option<String>)]
    pub check_in: Cell,

    #[schema(value_type = Option<String>)]
    pub check_out: Cell,

    #[schema(value_type = Option<String>)]
    pub late_indicator_raw: Cell,

    #[schema(value_type = Option<String>)]
    pub early_out: Cell,

    pub late_minutes: u32,

    /// Late records for this employee in the same batch.
    pub total_late_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Minutes read from a "Late In" style column.
    DirectIndicator,
    /// Minutes derived from check-in against the scheduled start.
    ScheduleDelta,
}

/// Result of one successful ingestion. Never mutated after it is built.
#[derive(Debug, Clone)]
pub struct Batch {
    pub records: Vec<AttendanceRecord>,
    pub strategy: StrategyKind,
    pub rows_read: usize,
    pub created_at: DateTime<Utc>,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
