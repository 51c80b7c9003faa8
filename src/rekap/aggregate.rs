use std::collections::HashMap;

use crate::model::attendance::AttendanceRecord;

/// Stamp every record with how many records share its employee name.
pub fn aggregate(mut records: Vec<AttendanceRecord>) -> Vec<AttendanceRecord> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for r in &records {
        *counts.entry(r.employee_name.clone()).or_default() += 1;
    }

    for r in &mut records {
        r.total_late_count = counts.get(&r.employee_name).copied().unwrap_or(0);
    }

    records
}
