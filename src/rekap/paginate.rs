use crate::model::attendance::AttendanceRecord;
use crate::model::summary::PageInfo;

pub const DEFAULT_PER_PAGE: usize = 50;

/// Slice one page out of `records`. Out-of-range page numbers are clamped
/// to the nearest valid page; an empty set yields page 1 of 1.
pub fn paginate(
    records: &[AttendanceRecord],
    page: i64,
    per_page: usize,
) -> (&[AttendanceRecord], PageInfo) {
    let per_page = per_page.max(1);
    let total = records.len();

    if total == 0 {
        return (
            &records[..0],
            PageInfo {
                current_page: 1,
                total_pages: 1,
                per_page,
                total_items: 0,
                start_index: 0,
                end_index: 0,
            },
        );
    }

    let total_pages = total.div_ceil(per_page);
    let current_page = page.clamp(1, total_pages as i64) as usize;

    let start = (current_page - 1) * per_page;
    let end = (start + per_page).min(total);

    (
        &records[start..end],
        PageInfo {
            current_page,
            total_pages,
            per_page,
            total_items: total,
            start_index: start + 1,
            end_index: end,
        },
    )
}
