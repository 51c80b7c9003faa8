use std::borrow::Cow;

use crate::model::attendance::AttendanceRecord;

/// Case-insensitive substring match on the employee name. A blank query
/// borrows the input as-is.
pub fn filter<'a>(records: &'a [AttendanceRecord], query: &str) -> Cow<'a, [AttendanceRecord]> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return Cow::Borrowed(records);
    }

    Cow::Owned(
        records
            .iter()
            .filter(|r| r.employee_name.to_lowercase().contains(&q))
            .cloned()
            .collect(),
    )
}
