pub mod dashboard;
pub mod metric_card;
pub mod trend_chart;
