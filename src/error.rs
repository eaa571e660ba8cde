use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metrics backend error: {0}")]
    Backend(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<duckdb::Error> for DashboardError {
    fn from(err: duckdb::Error) -> Self {
        DashboardError::Database(err.to_string())
    }
}

impl From<handlebars::RenderError> for DashboardError {
    fn from(err: handlebars::RenderError) -> Self {
        DashboardError::Render(err.to_string())
    }
}

impl From<handlebars::TemplateError> for DashboardError {
    fn from(err: handlebars::TemplateError) -> Self {
        DashboardError::Render(err.to_string())
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match self {
            DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Backend(_) => StatusCode::BAD_GATEWAY,
            DashboardError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Outcome of a step that must never fail its caller.
///
/// The error is kept around for logging and inspection, but the pipeline only
/// ever consumes `value`, which falls back to a default when the step failed.
#[derive(Debug)]
pub struct BestEffort<T> {
    pub value: T,
    pub error: Option<DashboardError>,
}

impl<T: Default> BestEffort<T> {
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self { value, error: None },
            Err(err) => Self {
                value: T::default(),
                error: Some(err),
            },
        }
    }
}

impl<T> BestEffort<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_effort_falls_back_to_default_on_error() {
        let outcome: BestEffort<Vec<f64>> =
            BestEffort::from_result(Err(DashboardError::Backend("throttled".into())));

        assert!(outcome.error.is_some());
        assert!(outcome.into_value().is_empty());
    }

    #[test]
    fn best_effort_keeps_value_on_success() {
        let outcome = BestEffort::from_result(Ok(vec![1.0, 2.0]));

        assert!(outcome.error.is_none());
        assert_eq!(outcome.into_value(), vec![1.0, 2.0]);
    }

    #[test]
    fn render_error_maps_to_internal_server_error() {
        let response = DashboardError::Render("missing partial".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
