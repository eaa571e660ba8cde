pub mod dashboard;

pub use dashboard::{dashboard_router, start_dashboard_server, AppState};
