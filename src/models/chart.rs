use serde::Serialize;

/// One named series of numeric points, index-aligned with the categories.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub data: Vec<f64>,
}

/// The `{categories, series}` shape consumed by the frontend chart widgets.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    pub fn new(categories: Vec<String>, series: Vec<ChartSeries>) -> Self {
        Self { categories, series }
    }
}
