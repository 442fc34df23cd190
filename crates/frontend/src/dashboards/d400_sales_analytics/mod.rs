pub mod api;
pub mod chart_geometry;
pub mod request_tracker;
pub mod ui;

pub use ui::dashboard::SalesAnalyticsDashboard;
