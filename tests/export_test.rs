//! Integration tests for the CSV export endpoints: attachment headers and
//! row-count parity with the paired data endpoints.

mod common;

use axum::http::{header, StatusCode};
use common::TestClient;
use serde_json::{json, Value};

#[tokio::test]
async fn test_member_report_export_matches_data_row_count() {
    let client = TestClient::admin().await;
    client.seed_daily_report("2024-01-10", "MYR", "LINE-A", 1_000.0, 400.0, 100, 300.0);
    client.seed_daily_report("2024-01-20", "MYR", "LINE-A", 2_000.0, 800.0, 200, 600.0);
    client.seed_daily_report("2024-02-05", "SGD", "LINE-B", 500.0, 100.0, 50, 200.0);

    let filters = json!({ "currency": "MYR", "year": 2024, "month": 1 });

    let (_, parsed): (_, Option<Value>) = client
        .get_json("/api/member-report/data?currency=MYR&year=2024&month=1")
        .await;
    let total = parsed.unwrap()["total"].as_i64().unwrap();
    assert_eq!(total, 2);

    let (status, body, headers) = client
        .post_json_raw("/api/member-report/export", &filters)
        .await;
    assert_eq!(status, StatusCode::OK);

    // Header line plus one line per data row.
    assert_eq!(body.lines().count() as i64, total + 1);

    let disposition = headers
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment; filename=\"member_report_"));
    assert!(disposition.ends_with(".csv\""));
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/csv");
}

#[tokio::test]
async fn test_member_report_export_empty_has_header_only() {
    let client = TestClient::admin().await;

    let (status, body, _) = client
        .post_json_raw("/api/member-report/export", &json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.lines().count(), 1);
    assert!(body.starts_with("date,currency,line"));
}

#[tokio::test]
async fn test_exchange_rate_export_matches_data_row_count() {
    let client = TestClient::admin().await;
    for date in ["2024-03-01", "2024-03-02", "2024-03-03"] {
        client
            .post_json(
                "/api/exchange-rate/save",
                &json!({ "date": date, "currency": "MYR", "rate": 4.45 }),
            )
            .await;
    }

    let (_, parsed): (_, Option<Value>) =
        client.get_json("/api/exchange-rate/data?currency=MYR").await;
    let total = parsed.unwrap()["total"].as_i64().unwrap();

    let (status, body, _) = client
        .post_json_raw("/api/exchange-rate/export", &json!({ "currency": "MYR" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.lines().count() as i64, total + 1);
    assert!(body.contains("2024-03-02-MYR"));
}

#[tokio::test]
async fn test_headcount_export_matches_data_row_count() {
    let client = TestClient::admin().await;
    for department in ["CS", "SR", "Cashier"] {
        client
            .post_json(
                "/api/headcount/save",
                &json!({ "year": 2024, "month": 6, "department": department, "headcount": 10 }),
            )
            .await;
    }

    let (_, parsed): (_, Option<Value>) =
        client.get_json("/api/headcount/data?year=2024&month=6").await;
    let total = parsed.unwrap()["total"].as_i64().unwrap();
    assert_eq!(total, 3);

    let (status, body, _) = client
        .post_json_raw("/api/headcount/export", &json!({ "year": 2024, "month": 6 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.lines().count() as i64, total + 1);
}

#[tokio::test]
async fn test_export_filters_stay_in_sync_with_data() {
    let client = TestClient::admin().await;
    client.seed_daily_report("2024-01-10", "MYR", "LINE-A", 1_000.0, 400.0, 100, 300.0);
    client.seed_daily_report("2024-03-10", "MYR", "LINE-A", 2_000.0, 800.0, 200, 600.0);

    // Date-range filtering applies to exports exactly as it does to data.
    let filters = json!({
        "filter_mode": "daterange",
        "start_date": "2024-01-01",
        "end_date": "2024-01-31"
    });

    let (_, body, _) = client
        .post_json_raw("/api/member-report/export", &filters)
        .await;
    assert_eq!(body.lines().count(), 2);
    assert!(body.contains("2024-01-10"));
    assert!(!body.contains("2024-03-10"));
}
