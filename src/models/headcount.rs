use serde::{Deserialize, Serialize};

/// Per-period department headcount snapshot. The mutable `uniquekey` acts as
/// the row's pseudo-primary-key for updates and deletes.
#[derive(Debug, Clone, Serialize)]
pub struct Headcount {
    pub id: i64,
    pub uniquekey: String,
    pub year: i32,
    pub month: u32,
    pub department: String,
    pub headcount: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveHeadcount {
    pub uniquekey: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub department: Option<String>,
    pub headcount: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateHeadcount {
    pub uniquekey: Option<String>,
    pub headcount: Option<i64>,
    pub department: Option<String>,
}
