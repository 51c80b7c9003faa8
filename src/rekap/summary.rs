use std::collections::{BTreeMap, HashMap};

use crate::model::attendance::AttendanceRecord;
use crate::model::summary::{SummaryStats, TopOffender, TrendPoint};

const TOP_N: usize = 5;

pub fn summarize(records: &[AttendanceRecord]) -> SummaryStats {
    if records.is_empty() {
        return SummaryStats::default();
    }

    // name -> highest count seen, in first-appearance order
    let mut order: Vec<TopOffender> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for r in records {
        match index.get(r.employee_name.as_str()) {
            Some(&i) => order[i].count = order[i].count.max(r.total_late_count),
            None => {
                index.insert(&r.employee_name, order.len());
                order.push(TopOffender {
                    name: r.employee_name.clone(),
                    count: r.total_late_count,
                });
            }
        }
    }

    let total_cases = records.len();
    let total_employees = order.len();

    // stable: equal counts stay in first-appearance order
    order.sort_by(|a, b| b.count.cmp(&a.count));
    order.truncate(TOP_N);

    SummaryStats {
        total_cases,
        total_employees,
        average_per_employee: total_cases as f64 / total_employees as f64,
        top5: order,
        trends: trends(records),
    }
}

fn trends(records: &[AttendanceRecord]) -> Vec<TrendPoint> {
    let mut per_date: BTreeMap<String, usize> = BTreeMap::new();
    for r in records {
        let date = r.date.to_string();
        if date.trim().is_empty() {
            continue;
        }
        *per_date.entry(date).or_default() += 1;
    }

    per_date
        .into_iter()
        .map(|(date, count)| TrendPoint { date, count })
        .collect()
}
