use crate::api::rekap::{
    ExportQuery, PreviewQuery, PreviewResponse, SummaryResponse, UploadQuery, UploadResponse,
};
use crate::model::attendance::{AttendanceRecord, StrategyKind};
use crate::model::summary::{PageInfo, TopOffender, TrendPoint};
use crate::rekap::{SortDirection, SortKey};
use crate::utils::sheet::SheetFormat;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Lateness Recap API",
        version = "1.0.0",
        description = r#"
## Attendance Lateness Recap

Upload a daily attendance export and get back every **late** check-in,
with a per-employee late count attached to each row.

### 🔹 Workflow
- **Upload** an `.xlsx` or `.csv` export (`POST /api/rekap`)
  - Header names are matched against known synonyms (`Full Name`, `Nama`, `Check In`, `Jam Masuk`, ...)
  - With a `Late In` column the minutes are read directly, otherwise they are
    computed from check-in against the scheduled start (default 08:00)
- **Preview** the batch with name search, column sorting and pagination (`GET /api/rekap/{batch}`)
  - the summary includes late cases per date (`trends`)
- **Download** the clean recap (`GET /api/rekap/{batch}/export`)

`{batch}` is the id returned by the upload, or `latest`.

### 📦 Response Format
- JSON responses, errors as `{"message": "..."}`
- 50 rows per page by default

---
Built with **Rust**, **Actix Web**, **calamine**, **rust_xlsxwriter** and **Utoipa**.
"#,
    ),
    paths(
        crate::api::rekap::upload,
        crate::api::rekap::preview,
        crate::api::rekap::export,
    ),
    components(
        schemas(
            UploadQuery,
            UploadResponse,
            PreviewQuery,
            PreviewResponse,
            ExportQuery,
            SummaryResponse,
            AttendanceRecord,
            StrategyKind,
            PageInfo,
            TopOffender,
            TrendPoint,
            SortKey,
            SortDirection,
            SheetFormat
        )
    ),
    tags(
        (name = "Rekap", description = "Attendance lateness recap APIs"),
    )
)]
pub struct ApiDoc;
