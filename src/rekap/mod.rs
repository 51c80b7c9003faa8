//! Lateness recap pipeline.
//!
//! header → column map → late rows → per-employee count → sort gives a
//! [`Batch`]; previews run filter → summarize → optional column sort →
//! paginate over it and
//! downloads go through [`export_table`].

pub mod aggregate;
pub mod columns;
pub mod export;
pub mod filter;
pub mod lateness;
pub mod normalize;
pub mod paginate;
pub mod sort;
pub mod summary;

use chrono::{NaiveTime, Utc};
use tracing::info;

use crate::error::Result;
use crate::model::attendance::Batch;
use crate::model::cell::Cell;
use crate::model::column::ColumnSchema;

pub use export::{ExportTable, export_table};
pub use filter::filter;
pub use paginate::paginate;
pub use sort::{SortDirection, SortKey, sort_by_column};
pub use summary::summarize;

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub schema: ColumnSchema,
    /// Start of day for the schedule-delta strategy.
    pub default_start: NaiveTime,
    /// End of day for derived early-out minutes.
    pub default_end: NaiveTime,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            schema: ColumnSchema::flexible(),
            default_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            default_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
        }
    }
}

/// Build a batch from a decoded sheet. Fails only when a required column
/// is missing; bad cells just read as "not late".
pub fn ingest<I, R>(header: &[Cell], rows: I, config: &IngestConfig) -> Result<Batch>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[Cell]>,
{
    let map = columns::resolve(header, &config.schema)?;
    let strategy = lateness::LatenessStrategy::select(&map, config.default_start);

    let normalized = normalize::normalize(rows, &map, &strategy, config.default_end);

    let mut records = aggregate::aggregate(normalized.records);
    sort::sort_records(&mut records);

    info!(
        strategy = ?strategy.kind(),
        rows_read = normalized.rows_read,
        skipped_names = normalized.skipped_names,
        skipped_on_time = normalized.skipped_on_time,
        late_cases = records.len(),
        "Attendance sheet ingested"
    );

    Ok(Batch {
        records,
        strategy: strategy.kind(),
        rows_read: normalized.rows_read,
        created_at: Utc::now(),
    })
}
