use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ExchangeRate {
    pub id: i64,
    pub uniquekey: String,
    pub date: String,
    pub currency: String,
    pub rate: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Save payload. The uniquekey is derived server-side as `"{date}-{currency}"`.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveExchangeRate {
    pub date: Option<String>,
    pub currency: Option<String>,
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExchangeRate {
    pub uniquekey: Option<String>,
    pub rate: Option<f64>,
}
