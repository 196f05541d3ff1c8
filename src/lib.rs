//! Desktop client for the well reporting service: uploads source tables,
//! opens generated files for download and renders the field/unit/well tree
//! and statistic cards returned by the service.

pub mod app;
pub mod config;
pub mod error;
pub mod report;
pub mod upload;
pub mod utils;

pub use config::ClientConfig;
pub use error::Error;
pub use upload::PageClient;
