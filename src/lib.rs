pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod storage;
pub mod table;

pub use error::{BestEffort, DashboardError, Result};
