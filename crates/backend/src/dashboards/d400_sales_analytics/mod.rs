pub mod aggregator;
pub mod error;
pub mod loader;
pub mod service;
pub mod session;
pub mod trend;

pub use error::SalesDataError;
