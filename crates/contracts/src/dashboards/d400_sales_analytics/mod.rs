pub mod branch_filter;
pub mod dto;
pub mod metrics;

pub use branch_filter::{BranchFilter, ALL_BRANCHES};
pub use dto::*;
pub use metrics::{percent_change, MetricDeltas};
