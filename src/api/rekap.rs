use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

use crate::config::Config;
use crate::error::RekapError;
use crate::model::attendance::{AttendanceRecord, StrategyKind};
use crate::model::summary::{PageInfo, SummaryStats, TopOffender, TrendPoint};
use crate::rekap::{self, SortDirection, SortKey};
use crate::utils::batch_store::BatchStore;
use crate::utils::sheet::{self, EXPORT_FILE_STEM, SheetFormat};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Original file name, used to pick xlsx or csv
    #[schema(example = "absensi_januari.xlsx")]
    pub filename: Option<String>,
    /// Sheet to read; defaults to the configured sheet, then the first one
    #[schema(example = "Worksheet")]
    pub sheet: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "6f1c2a7e-8d0b-4c1f-9a51-2f0d3c9b7e11", format = "uuid")]
    pub batch_id: String,
    #[schema(example = "Attendance processed")]
    pub message: String,
    pub strategy: StrategyKind,
    #[schema(example = 420)]
    pub rows_read: usize,
    #[schema(example = 37)]
    pub total_cases: usize,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PreviewQuery {
    /// Case-insensitive employee name filter
    #[schema(example = "bob")]
    pub q: Option<String>,
    /// 1-based page number, clamped into range
    #[schema(example = 1)]
    pub page: Option<i64>,
    /// Column to order the filtered rows by; default is name then date
    pub sort: Option<SortKey>,
    /// asc (default) or desc
    pub dir: Option<SortDirection>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// xlsx (default) or csv
    pub format: Option<SheetFormat>,
}

#[derive(Serialize, ToSchema)]
pub struct SummaryResponse {
    #[schema(example = 37)]
    pub total_cases: usize,
    #[schema(example = 12)]
    pub total_employees: usize,
    #[schema(example = 3.08)]
    pub avg_per_employee: f64,
    pub top5: Vec<TopOffender>,
    pub trends: Vec<TrendPoint>,
}

impl From<SummaryStats> for SummaryResponse {
    fn from(s: SummaryStats) -> Self {
        Self {
            total_cases: s.total_cases,
            total_employees: s.total_employees,
            avg_per_employee: (s.average_per_employee * 100.0).round() / 100.0,
            top5: s.top5,
            trends: s.trends,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PreviewResponse {
    #[schema(format = "uuid")]
    pub batch_id: String,
    pub q: String,
    pub data: Vec<AttendanceRecord>,
    pub page_info: PageInfo,
    pub summary: SummaryResponse,
}

/// Upload an attendance export
#[utoipa::path(
    post,
    path = "/api/rekap",
    params(UploadQuery),
    request_body(content = String, content_type = "application/octet-stream",
        description = "Raw .xlsx or .csv file"),
    responses(
        (status = 200, description = "Attendance processed", body = UploadResponse),
        (status = 400, description = "Missing column or unreadable file", body = Object, example = json!({
            "message": "required column 'CheckIn' not found in header"
        })),
        (status = 429, description = "Too many uploads")
    ),
    tag = "Rekap"
)]
#[instrument(name = "rekap_upload", skip(req, body, store, config), fields(bytes = body.len()))]
pub async fn upload(
    req: HttpRequest,
    body: web::Bytes,
    query: web::Query<UploadQuery>,
    store: web::Data<BatchStore>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    if body.is_empty() {
        return Err(RekapError::EmptyUpload.into());
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let format = SheetFormat::detect(query.filename.as_deref(), content_type)?;

    let query = query.into_inner();
    let sheet_name = query.sheet.or_else(|| config.sheet_name.clone());
    let ingest_config = config.ingest_config();
    debug!(?format, sheet = ?sheet_name, "Decoding upload");

    let batch = web::block(move || {
        let decoded = sheet::decode(&body, format, sheet_name.as_deref())?;
        rekap::ingest(&decoded.header, &decoded.rows, &ingest_config)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Ingestion worker failed");
        ErrorInternalServerError("Internal Server Error")
    })?
    .inspect_err(|e| info!(error = %e, "Upload rejected"))?;

    if batch.is_empty() {
        warn!(rows_read = batch.rows_read, "No late check-ins in upload");
    }

    let response = UploadResponse {
        batch_id: String::new(),
        message: "Attendance processed".to_string(),
        strategy: batch.strategy,
        rows_read: batch.rows_read,
        total_cases: batch.len(),
    };

    let batch_id = store.insert(batch).await;
    info!(%batch_id, total_cases = response.total_cases, "Batch ready");

    Ok(HttpResponse::Ok().json(UploadResponse {
        batch_id: batch_id.to_string(),
        ..response
    }))
}

/// Preview a processed batch
#[utoipa::path(
    get,
    path = "/api/rekap/{batch}",
    params(
        ("batch" = String, Path, description = "Batch id, or `latest`"),
        PreviewQuery
    ),
    responses(
        (status = 200, description = "Filtered, sorted, paginated recap", body = PreviewResponse),
        (status = 404, description = "No processed data", body = Object, example = json!({
            "message": "no processed data found for this batch"
        }))
    ),
    tag = "Rekap"
)]
#[instrument(name = "rekap_preview", skip(store, config))]
pub async fn preview(
    path: web::Path<String>,
    query: web::Query<PreviewQuery>,
    store: web::Data<BatchStore>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let (batch_id, batch) = store.resolve(&path).await?;

    let q = query.q.clone().unwrap_or_default();
    let mut filtered = rekap::filter(&batch.records, &q);
    let summary = rekap::summarize(&filtered);

    if let Some(key) = query.sort {
        rekap::sort_by_column(filtered.to_mut(), key, query.dir.unwrap_or_default());
    }
    let (page, page_info) = rekap::paginate(&filtered, query.page.unwrap_or(1), config.rows_per_page);

    debug!(
        %batch_id,
        created_at = %batch.created_at,
        matched = filtered.len(),
        page = page_info.current_page,
        "Preview served"
    );

    Ok(HttpResponse::Ok().json(PreviewResponse {
        batch_id: batch_id.to_string(),
        q,
        data: page.to_vec(),
        page_info,
        summary: summary.into(),
    }))
}

/// Download the whole batch as a clean spreadsheet
#[utoipa::path(
    get,
    path = "/api/rekap/{batch}/export",
    params(
        ("batch" = String, Path, description = "Batch id, or `latest`"),
        ExportQuery
    ),
    responses(
        (status = 200, description = "Spreadsheet file", body = String, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 404, description = "No processed data")
    ),
    tag = "Rekap"
)]
#[instrument(name = "rekap_export", skip(store))]
pub async fn export(
    path: web::Path<String>,
    query: web::Query<ExportQuery>,
    store: web::Data<BatchStore>,
) -> actix_web::Result<impl Responder> {
    let (batch_id, batch) = store.resolve(&path).await?;
    let format = query.format.unwrap_or(SheetFormat::Xlsx);

    let table = rekap::export_table(&batch);
    let bytes = sheet::encode(&table, format).inspect_err(|e| {
        error!(error = %e, %batch_id, "Export failed");
    })?;

    info!(%batch_id, rows = table.rows.len(), ?format, "Export served");

    Ok(HttpResponse::Ok()
        .content_type(format.mime())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(format!(
                "{EXPORT_FILE_STEM}.{}",
                format.extension()
            ))],
        })
        .body(bytes))
}
