use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TopOffender {
    #[schema(example = "Bob")]
    pub name: String,
    #[schema(example = 4)]
    pub count: u32,
}

/// Late cases on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TrendPoint {
    #[schema(example = "2024-01-02")]
    pub date: String,
    #[schema(example = 6)]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SummaryStats {
    pub total_cases: usize,
    pub total_employees: usize,
    pub average_per_employee: f64,
    pub top5: Vec<TopOffender>,
    /// Ordered by date text; undated records are left out.
    pub trends: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PageInfo {
    #[schema(example = 1)]
    pub current_page: usize,
    #[schema(example = 3)]
    pub total_pages: usize,
    #[schema(example = 50)]
    pub per_page: usize,
    #[schema(example = 120)]
    pub total_items: usize,
    #[schema(example = 1)]
    pub start_index: usize,
    #[schema(example = 50)]
    pub end_index: usize,
}
