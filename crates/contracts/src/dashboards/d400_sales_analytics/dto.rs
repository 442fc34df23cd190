use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::branch_filter::BranchFilter;
use super::metrics::MetricDeltas;

/// One row of the uploaded CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub branch: String,
    pub product: String,
    pub year: i32,
    /// 1..=12
    pub month: u32,
    /// NaN when the cell was empty
    pub units_sold: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
}

impl SalesRecord {
    /// Period key used for chronological ordering
    pub fn period(&self) -> (i32, u32) {
        (self.year, self.month)
    }
}

/// Per-product summary within the active branch filter.
///
/// Means are `None` when every contributing value was undefined
/// (zero denominator or empty cell). Sums skip undefined terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product: String,
    pub average_price: Option<f64>,
    pub previous_average_price: Option<f64>,
    pub average_margin: Option<f64>,
    pub previous_average_margin: Option<f64>,
    pub total_units_sold: f64,
    pub previous_total_units_sold: f64,
}

impl ProductSummary {
    pub fn deltas(&self) -> MetricDeltas {
        MetricDeltas::from_summary(self)
    }
}

/// Single point of a product trend chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// First day of the period
    pub date: NaiveDate,
    /// `None` when the cell was empty
    pub units_sold: Option<f64>,
    /// Trailing rolling mean, `None` until the window is full
    pub smoothed_units: Option<f64>,
    /// Value of the fitted trend line at this point
    pub trend: f64,
}

/// Axis metadata for gridlines and tick labels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendAxis {
    /// Distinct years present, ascending
    pub years: Vec<i32>,
    /// January 1st of every year in `years`
    pub year_starts: Vec<NaiveDate>,
    /// Every month start between the first and the last point inclusive
    pub month_starts: Vec<NaiveDate>,
}

/// Smoothed units series with its linear trend, built per product and branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub product: String,
    pub branch: BranchFilter,
    pub window: usize,
    pub slope: f64,
    pub intercept: f64,
    pub points: Vec<TrendPoint>,
    pub axis: TrendAxis,
}

/// Metric block and chart for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCard {
    pub summary: ProductSummary,
    pub deltas: MetricDeltas,
    pub trend: TrendSeries,
}

/// Response for POST /api/d400/upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub upload_id: Uuid,
    pub file_name: String,
    pub row_count: usize,
    /// "All" first, then branches in order of first appearance
    pub branches: Vec<String>,
    /// Distinct products, sorted
    pub products: Vec<String>,
}

/// Request for the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesDashboardRequest {
    #[serde(default)]
    pub branch: BranchFilter,
}

/// Request for a single product trend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendRequest {
    pub product: String,
    #[serde(default)]
    pub branch: BranchFilter,
}

/// Response for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesDashboardResponse {
    pub upload_id: Uuid,
    pub file_name: String,
    pub branch: BranchFilter,
    pub branches: Vec<String>,
    pub products: Vec<ProductCard>,
}

/// Error body returned by every d400 endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
