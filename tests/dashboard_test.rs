//! Integration tests for the dashboard KPI summary.

mod common;

use axum::http::StatusCode;
use common::TestClient;
use serde_json::Value;

#[tokio::test]
async fn test_summary_month_over_month_change() {
    let client = TestClient::admin().await;
    client.seed_monthly(2024, 5, "MYR", "LINE-A", 100_000.0, 40_000.0, 900, 30_000.0);
    client.seed_monthly(2024, 6, "MYR", "LINE-A", 150_000.0, 50_000.0, 990, 45_000.0);

    let (status, parsed): (_, Option<Value>) = client
        .get_json("/api/dashboard/summary?currency=MYR&year=2024&month=6")
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = parsed.unwrap();

    assert_eq!(data["success"], true);
    assert_eq!(data["kpis"]["depositAmount"]["value"], 150_000.0);
    assert_eq!(data["kpis"]["depositAmount"]["change"], 50.0);
    assert_eq!(data["kpis"]["activeMembers"]["value"], 990.0);
    assert_eq!(data["kpis"]["activeMembers"]["change"], 10.0);
}

#[tokio::test]
async fn test_summary_zero_baseline_yields_null_change() {
    let client = TestClient::admin().await;
    // No May data at all: every previous-period aggregate is zero.
    client.seed_monthly(2024, 6, "MYR", "LINE-A", 100.0, 50.0, 10, 25.0);

    let (status, body) = client
        .get("/api/dashboard/summary?currency=MYR&year=2024&month=6")
        .await;
    assert_eq!(status, StatusCode::OK);

    // The raw body must never contain a non-finite number.
    assert!(!body.contains("Infinity"));
    assert!(!body.contains("NaN"));

    let data: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(data["kpis"]["depositAmount"]["value"], 100.0);
    assert!(data["kpis"]["depositAmount"]["change"].is_null());
}

#[tokio::test]
async fn test_summary_includes_daily_fact_kpis() {
    let client = TestClient::admin().await;
    client.seed_new_depositor("2024-06-10", "MYR", "LINE-A", 30);
    client.seed_new_depositor("2024-06-11", "MYR", "LINE-A", 20);
    client.seed_new_depositor("2024-05-10", "MYR", "LINE-A", 25);
    client.seed_new_register("2024-06-12", "MYR", "LINE-A", 70);
    client.seed_adjustment("2024-06-15", "MYR", "LINE-A", -500.0);

    let (_, parsed): (_, Option<Value>) = client
        .get_json("/api/dashboard/summary?currency=MYR&year=2024&month=6")
        .await;
    let data = parsed.unwrap();

    assert_eq!(data["kpis"]["newDepositors"]["value"], 50.0);
    assert_eq!(data["kpis"]["newDepositors"]["change"], 100.0);
    assert_eq!(data["kpis"]["newRegisters"]["value"], 70.0);
    assert_eq!(data["kpis"]["netAdjustment"]["value"], -500.0);
}

#[tokio::test]
async fn test_summary_cards_carry_trend_colors() {
    let client = TestClient::admin().await;
    client.seed_monthly(2024, 5, "MYR", "LINE-A", 100.0, 100.0, 100, 100.0);
    client.seed_monthly(2024, 6, "MYR", "LINE-A", 200.0, 50.0, 100, 150.0);

    let (_, parsed): (_, Option<Value>) = client
        .get_json("/api/dashboard/summary?currency=MYR&year=2024&month=6")
        .await;
    let data = parsed.unwrap();
    let cards = data["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 7);

    let deposit_card = &cards[0];
    assert_eq!(deposit_card["title"], "Deposit Amount");
    assert_eq!(deposit_card["value"], "200");
    assert!(deposit_card["subtitle"]
        .as_str()
        .unwrap()
        .starts_with("+100.00%"));

    let withdraw_card = &cards[1];
    assert!(withdraw_card["subtitle"].as_str().unwrap().starts_with('-'));
    assert_ne!(deposit_card["color"], withdraw_card["color"]);
}

#[tokio::test]
async fn test_summary_respects_line_filter() {
    let client = TestClient::admin().await;
    client.seed_monthly(2024, 6, "MYR", "LINE-A", 100.0, 0.0, 10, 0.0);
    client.seed_monthly(2024, 6, "MYR", "LINE-B", 900.0, 0.0, 90, 0.0);

    let (_, parsed): (_, Option<Value>) = client
        .get_json("/api/dashboard/summary?currency=MYR&line=LINE-A&year=2024&month=6")
        .await;
    let data = parsed.unwrap();

    assert_eq!(data["kpis"]["depositAmount"]["value"], 100.0);
}
