pub mod cloudwatch;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::{
    BestEffort,
    Result,
    models::{Dimension, MetricQuery, TimeRange},
};

pub use cloudwatch::{CloudWatchBackend, CloudWatchProvider};

/// A metrics service answering single-series queries.
#[async_trait]
pub trait MetricsBackend: Send + Sync {
    /// Values of the one series `query` selects over `range`.
    ///
    /// A response carrying no series at all is an error.
    async fn get_metric_data(&self, query: &MetricQuery, range: &TimeRange) -> Result<Vec<f64>>;
}

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Builds a fresh backend for each page request.
#[async_trait]
pub trait BackendProvider: Send + Sync {
    async fn connect(&self, region: &str, credentials: Credentials) -> Box<dyn MetricsBackend>;
}

pub struct MetricFetcher<'a> {
    backend: &'a dyn MetricsBackend,
}

impl<'a> MetricFetcher<'a> {
    pub fn new(backend: &'a dyn MetricsBackend) -> Self {
        Self { backend }
    }

    /// Fetches one metric and logs any failure. The returned value is empty
    /// whenever the error is set.
    pub async fn try_fetch(
        &self,
        namespace: &str,
        metric_name: &str,
        dimensions: &[Dimension],
        range: &TimeRange,
    ) -> BestEffort<Vec<f64>> {
        let query = MetricQuery::new(namespace, metric_name, dimensions);
        let outcome = BestEffort::from_result(self.backend.get_metric_data(&query, range).await);

        match &outcome.error {
            Some(e) => error!(metric = %metric_name, error = %e, "Error fetching metric"),
            None => debug!(
                metric = %metric_name,
                namespace = %namespace,
                samples = outcome.value.len(),
                "Fetched metric"
            ),
        }

        outcome
    }

    pub async fn fetch(
        &self,
        namespace: &str,
        metric_name: &str,
        dimensions: &[Dimension],
        range: &TimeRange,
    ) -> Vec<f64> {
        self.try_fetch(namespace, metric_name, dimensions, range)
            .await
            .into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::default_time_range, DashboardError};
    use std::sync::Mutex;

    struct RecordingBackend {
        queries: Mutex<Vec<MetricQuery>>,
        response: fn() -> Result<Vec<f64>>,
    }

    #[async_trait]
    impl MetricsBackend for RecordingBackend {
        async fn get_metric_data(&self, query: &MetricQuery, _range: &TimeRange) -> Result<Vec<f64>> {
            self.queries.lock().unwrap().push(query.clone());
            (self.response)()
        }
    }

    #[tokio::test]
    async fn fetch_returns_values_in_response_order() {
        let backend = RecordingBackend {
            queries: Mutex::new(Vec::new()),
            response: || Ok(vec![3.0, 1.0, 2.0]),
        };
        let fetcher = MetricFetcher::new(&backend);
        let dims = [Dimension::new("InstanceId", "i-1")];

        let values = fetcher
            .fetch("AWS/EC2", "NetworkIn", &dims, &default_time_range())
            .await;

        assert_eq!(values, vec![3.0, 1.0, 2.0]);
        let queries = backend.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].namespace, "AWS/EC2");
        assert_eq!(queries[0].dimensions, dims.to_vec());
    }

    #[tokio::test]
    async fn backend_error_becomes_empty_series() {
        let backend = RecordingBackend {
            queries: Mutex::new(Vec::new()),
            response: || Err(DashboardError::Backend("AccessDenied".into())),
        };
        let fetcher = MetricFetcher::new(&backend);

        let outcome = fetcher
            .try_fetch("AWS/RDS", "FreeableMemory", &[], &default_time_range())
            .await;

        assert!(outcome.error.is_some());
        assert!(outcome.value.is_empty());
    }
}
