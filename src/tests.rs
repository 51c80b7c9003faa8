use std::time::Duration;

use actix_web::http::{StatusCode, header};
use actix_web::web::Data;
use actix_web::{App, test as http_test};
use chrono::NaiveTime;
use rust_xlsxwriter::Workbook;
use serde_json::Value;

use crate::config::Config;
use crate::error::RekapError;
use crate::model::attendance::StrategyKind;
use crate::model::cell::Cell;
use crate::model::column::{CanonicalField, ColumnSchema};
use crate::rekap::{self, IngestConfig};
use crate::routes;
use crate::utils::batch_store::BatchStore;

const ATTENDANCE_HEADER: [&str; 6] = ["Full Name", "Date", "Check In", "Check Out", "Late In", "Early Out"];

fn cells(values: &[&str]) -> Vec<Cell> {
    values.iter().map(|v| Cell::from(*v)).collect()
}

fn ingest_rows(rows: &[&[&str]]) -> crate::model::attendance::Batch {
    let rows: Vec<Vec<Cell>> = rows.iter().map(|r| cells(r)).collect();
    rekap::ingest(&cells(&ATTENDANCE_HEADER), &rows, &IngestConfig::default())
        .expect("header has every column")
}

#[test]
fn single_late_row_becomes_one_record() {
    let batch = ingest_rows(&[&["Alice", "2024-01-01", "08:10", "17:00", "10", ""]]);

    assert_eq!(batch.strategy, StrategyKind::DirectIndicator);
    assert_eq!(batch.len(), 1);
    let r = &batch.records[0];
    assert_eq!(r.employee_name, "Alice");
    assert_eq!(r.late_minutes, 10);
    assert_eq!(r.total_late_count, 1);
    assert_eq!(r.date, Cell::text("2024-01-01"));
    assert_eq!(r.early_out, Cell::Empty);
}

#[test]
fn digits_are_pulled_out_of_free_text() {
    let batch = ingest_rows(&[&["Alice", "2024-01-01", "08:05", "17:00", "T+5", ""]]);
    assert_eq!(batch.records[0].late_minutes, 5);
    assert_eq!(batch.records[0].late_indicator_raw, Cell::text("T+5"));
}

#[test]
fn zero_and_blank_indicators_are_dropped() {
    let batch = ingest_rows(&[
        &["Alice", "2024-01-01", "08:00", "17:00", "0", ""],
        &["Alice", "2024-01-02", "08:00", "17:00", "", ""],
        &["Alice", "2024-01-03", "08:00", "17:00", "  ", ""],
    ]);
    assert!(batch.is_empty());
    assert_eq!(batch.rows_read, 3);
}

#[test]
fn trailing_space_names_merge_into_one_employee() {
    let batch = ingest_rows(&[
        &["Bob ", "2024-01-02", "08:10", "17:00", "10", ""],
        &["Bob", "2024-01-01", "08:20", "17:00", "20", ""],
    ]);

    assert_eq!(batch.len(), 2);
    assert!(batch.records.iter().all(|r| r.employee_name == "Bob"));
    assert!(batch.records.iter().all(|r| r.total_late_count == 2));
    // sorted by date within the name
    assert_eq!(batch.records[0].date, Cell::text("2024-01-01"));
}

#[test]
fn empty_batch_summarizes_and_paginates_to_zero() {
    let batch = ingest_rows(&[]);

    let summary = rekap::summarize(&batch.records);
    assert_eq!(summary.total_cases, 0);
    assert_eq!(summary.total_employees, 0);
    assert_eq!(summary.average_per_employee, 0.0);
    assert!(summary.top5.is_empty());

    let (page, info) = rekap::paginate(&batch.records, 1, 50);
    assert!(page.is_empty());
    assert_eq!((info.current_page, info.total_pages, info.total_items), (1, 1, 0));
}

#[test]
fn every_record_is_late_and_counts_agree() {
    let batch = ingest_rows(&[
        &["Dina", "2024-01-03", "08:01", "17:00", "1", ""],
        &["eko", "2024-01-01", "08:00", "17:00", "0", ""],
        &["Eko", "2024-01-02", "08:30", "17:00", "0:30", ""],
        &["Dina", "2024-01-01", "08:02", "17:00", "2 min", ""],
        &["  ", "2024-01-01", "09:00", "17:00", "60", ""],
        &["Eko", "", "09:00", "17:00", "60", ""],
    ]);

    assert!(batch.records.iter().all(|r| r.late_minutes > 0));
    for r in &batch.records {
        let same_name = batch
            .records
            .iter()
            .filter(|o| o.employee_name == r.employee_name)
            .count() as u32;
        assert_eq!(r.total_late_count, same_name);
    }

    let order: Vec<_> = batch
        .records
        .iter()
        .map(|r| (r.employee_name.as_str(), r.date.to_string()))
        .collect();
    assert_eq!(
        order,
        [
            ("Dina", "2024-01-01".to_string()),
            ("Dina", "2024-01-03".to_string()),
            ("Eko", String::new()),
            ("Eko", "2024-01-02".to_string()),
        ]
    );
}

#[test]
fn schedule_columns_drive_lateness_without_late_in() {
    let header = cells(&["Nama", "Tanggal", "Jam Masuk", "Jam Pulang", "Shift In"]);
    let rows = vec![
        cells(&["Sari", "2024-02-01", "08:15", "16:30", ""]),
        cells(&["Sari", "2024-02-02", "09:05", "17:00", "09:00"]),
        cells(&["Tono", "2024-02-01", "07:58", "17:00", ""]),
        cells(&["Tono", "2024-02-02", "pagi", "17:00", ""]),
    ];
    let config = IngestConfig {
        default_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        ..IngestConfig::default()
    };

    let batch = rekap::ingest(&header, &rows, &config).unwrap();

    assert_eq!(batch.strategy, StrategyKind::ScheduleDelta);
    let late: Vec<_> = batch
        .records
        .iter()
        .map(|r| (r.employee_name.as_str(), r.late_minutes, r.early_out.clone()))
        .collect();
    assert_eq!(
        late,
        [
            ("Sari", 15, Cell::Number(30.0)),
            ("Sari", 5, Cell::Number(0.0)),
        ]
    );
}

#[test]
fn missing_required_column_fails_before_rows() {
    let err = rekap::ingest(
        &cells(&["Full Name", "Date", "Check In", "Check Out", "Late In"]),
        &[cells(&["Alice", "2024-01-01", "08:10", "17:00", "10"])],
        &IngestConfig {
            schema: ColumnSchema::strict(),
            ..IngestConfig::default()
        },
    )
    .unwrap_err();

    assert!(matches!(
        err,
        RekapError::MissingColumn {
            field: CanonicalField::EarlyOut
        }
    ));
}

// ---------- HTTP ----------

const CSV_UPLOAD: &str = "Full Name,Date,Check In,Check Out,Late In,Early Out
Alice,2024-01-01,08:10,17:00,10,
Bob ,2024-01-02,08:05,17:00,T+5,
Bob,2024-01-01,08:03,17:00,3,
Carl,2024-01-01,07:59,17:00,0,
";

fn test_config() -> Config {
    Config {
        rows_per_page: 2,
        rate_upload_per_min: 0,
        ..Config::default()
    }
}

macro_rules! test_app {
    () => {{
        let config = test_config();
        http_test::init_service(
            App::new()
                .app_data(Data::new(BatchStore::new(8, Duration::from_secs(60))))
                .app_data(Data::new(config.clone()))
                .configure(|cfg| routes::configure(cfg, &config)),
        )
        .await
    }};
}

fn upload_request(filename: &str, body: impl Into<Vec<u8>>) -> http_test::TestRequest {
    http_test::TestRequest::post()
        .uri(&format!("/api/rekap?filename={filename}"))
        .set_payload(body.into())
}

#[actix_web::test]
async fn upload_then_preview_pages_and_filters() {
    let app = test_app!();

    let uploaded: Value =
        http_test::call_and_read_body_json(&app, upload_request("absen.csv", CSV_UPLOAD).to_request()).await;
    assert_eq!(uploaded["total_cases"], 3);
    assert_eq!(uploaded["rows_read"], 4);
    assert_eq!(uploaded["strategy"], "direct_indicator");
    let batch_id = uploaded["batch_id"].as_str().unwrap().to_string();

    let req = http_test::TestRequest::get()
        .uri(&format!("/api/rekap/{batch_id}?page=2"))
        .to_request();
    let page: Value = http_test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["page_info"]["current_page"], 2);
    assert_eq!(page["page_info"]["total_pages"], 2);
    assert_eq!(page["page_info"]["start_index"], 3);
    assert_eq!(page["page_info"]["end_index"], 3);
    assert_eq!(page["data"][0]["employee_name"], "Bob");
    assert_eq!(page["data"][0]["late_indicator_raw"], "T+5");
    assert_eq!(page["data"][0]["total_late_count"], 2);
    assert_eq!(page["summary"]["total_cases"], 3);
    assert_eq!(page["summary"]["avg_per_employee"], 1.5);

    let req = http_test::TestRequest::get()
        .uri("/api/rekap/latest?q=BOB")
        .to_request();
    let filtered: Value = http_test::call_and_read_body_json(&app, req).await;
    assert_eq!(filtered["batch_id"], batch_id.as_str());
    assert_eq!(filtered["data"].as_array().unwrap().len(), 2);
    assert_eq!(filtered["summary"]["total_employees"], 1);
    assert_eq!(filtered["summary"]["top5"][0]["name"], "Bob");
    assert_eq!(filtered["summary"]["top5"][0]["count"], 2);
}

#[actix_web::test]
async fn export_returns_the_whole_batch() {
    let app = test_app!();
    http_test::call_service(&app, upload_request("absen.csv", CSV_UPLOAD).to_request()).await;

    let req = http_test::TestRequest::get()
        .uri("/api/rekap/latest/export?format=csv")
        .to_request();
    let resp = http_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("rekap_semua_telat_clean.csv"));

    let body = http_test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines[0],
        "Full Name,Total Late Count,Date,Check In,Check Out,Late In,Late Minutes,Early Out"
    );
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "Alice,1,2024-01-01,08:10,17:00,10,10,");
}

#[actix_web::test]
async fn xlsx_upload_reads_the_requested_sheet() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Worksheet").unwrap();
    for (col, title) in ATTENDANCE_HEADER.iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }
    sheet.write_string(1, 0, "Alice").unwrap();
    sheet.write_string(1, 1, "2024-01-01").unwrap();
    sheet.write_string(1, 2, "08:10").unwrap();
    sheet.write_string(1, 3, "17:00").unwrap();
    sheet.write_number(1, 4, 10).unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let app = test_app!();
    let req = http_test::TestRequest::post()
        .uri("/api/rekap?filename=absen.xlsx&sheet=Worksheet")
        .set_payload(bytes.clone())
        .to_request();
    let uploaded: Value = http_test::call_and_read_body_json(&app, req).await;
    assert_eq!(uploaded["total_cases"], 1);

    let req = http_test::TestRequest::post()
        .uri("/api/rekap?filename=absen.xlsx&sheet=Rekap")
        .set_payload(bytes)
        .to_request();
    let resp = http_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn failed_upload_keeps_the_previous_batch() {
    let app = test_app!();
    let first: Value =
        http_test::call_and_read_body_json(&app, upload_request("absen.csv", CSV_UPLOAD).to_request()).await;

    let resp = http_test::call_service(&app, upload_request("absen.csv", "Name\nAlice\n").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = http_test::read_body_json(resp).await;
    assert_eq!(body["message"], "required column 'CheckIn' not found in header");

    let req = http_test::TestRequest::get().uri("/api/rekap/latest").to_request();
    let latest: Value = http_test::call_and_read_body_json(&app, req).await;
    assert_eq!(latest["batch_id"], first["batch_id"]);
}

#[actix_web::test]
async fn bad_requests_are_reported() {
    let app = test_app!();

    let resp = http_test::call_service(&app, upload_request("absen.csv", Vec::<u8>::new()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = http_test::call_service(&app, upload_request("absen.pdf", "x").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = http_test::TestRequest::get().uri("/api/rekap/latest").to_request();
    let resp = http_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = http_test::TestRequest::get()
        .uri("/api/rekap/00000000-0000-0000-0000-000000000000/export")
        .to_request();
    let resp = http_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn preview_sorts_after_filtering_and_reports_trends() {
    let app = test_app!();
    http_test::call_service(&app, upload_request("absen.csv", CSV_UPLOAD).to_request()).await;

    let req = http_test::TestRequest::get()
        .uri("/api/rekap/latest?sort=late_minutes&dir=desc")
        .to_request();
    let sorted: Value = http_test::call_and_read_body_json(&app, req).await;
    let minutes: Vec<_> = sorted["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["late_minutes"].as_u64().unwrap())
        .collect();
    assert_eq!(minutes, [10, 5]);
    assert_eq!(
        sorted["summary"]["trends"],
        serde_json::json!([
            {"date": "2024-01-01", "count": 2},
            {"date": "2024-01-02", "count": 1}
        ])
    );

    let req = http_test::TestRequest::get()
        .uri("/api/rekap/latest?q=bob&sort=date&dir=desc")
        .to_request();
    let filtered: Value = http_test::call_and_read_body_json(&app, req).await;
    assert_eq!(filtered["data"][0]["date"], "2024-01-02");
    assert_eq!(filtered["data"][1]["date"], "2024-01-01");
    assert_eq!(filtered["summary"]["trends"].as_array().unwrap().len(), 2);

    let req = http_test::TestRequest::get()
        .uri("/api/rekap/latest?sort=shoe_size")
        .to_request();
    let resp = http_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
