use async_trait::async_trait;
use aws_sdk_cloudwatch::{
    config::{BehaviorVersion, Credentials as AwsCredentials, Region},
    error::DisplayErrorContext,
    primitives::DateTime,
    types::{Dimension as AwsDimension, Metric, MetricDataQuery, MetricStat},
    Client,
};
use tracing::debug;

use crate::{
    DashboardError,
    Result,
    models::{MetricQuery, TimeRange},
};

use super::{BackendProvider, Credentials, MetricsBackend};

const QUERY_ID: &str = "m1";
const CREDENTIALS_SOURCE: &str = "environment";

/// CloudWatch `GetMetricData` backend.
#[derive(Debug, Clone)]
pub struct CloudWatchBackend {
    client: Client,
}

impl CloudWatchBackend {
    pub fn new(region: &str, credentials: Credentials) -> Self {
        let credentials = AwsCredentials::new(
            credentials.access_key_id,
            credentials.secret_access_key,
            None,
            None,
            CREDENTIALS_SOURCE,
        );

        let config = aws_sdk_cloudwatch::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .build();

        Self {
            client: Client::from_conf(config),
        }
    }

    fn build_query(query: &MetricQuery) -> MetricDataQuery {
        let dimensions: Vec<AwsDimension> = query
            .dimensions
            .iter()
            .map(|d| AwsDimension::builder().name(&d.name).value(&d.value).build())
            .collect();

        let metric = Metric::builder()
            .namespace(&query.namespace)
            .metric_name(&query.metric_name)
            .set_dimensions(Some(dimensions))
            .build();

        let stat = MetricStat::builder()
            .metric(metric)
            .period(query.period_seconds)
            .stat(&query.statistic)
            .build();

        MetricDataQuery::builder()
            .id(QUERY_ID)
            .metric_stat(stat)
            .return_data(true)
            .build()
    }
}

#[async_trait]
impl MetricsBackend for CloudWatchBackend {
    async fn get_metric_data(&self, query: &MetricQuery, range: &TimeRange) -> Result<Vec<f64>> {
        let data_query = Self::build_query(query);

        let output = self
            .client
            .get_metric_data()
            .metric_data_queries(data_query)
            .start_time(DateTime::from_secs(range.start.timestamp()))
            .end_time(DateTime::from_secs(range.end.timestamp()))
            .send()
            .await
            .map_err(|e| DashboardError::Backend(DisplayErrorContext(&e).to_string()))?;

        let series = output.metric_data_results().first().ok_or_else(|| {
            DashboardError::Backend(format!("no result series for {}", query.metric_name))
        })?;

        debug!(
            metric = %query.metric_name,
            status = ?series.status_code(),
            "CloudWatch returned series"
        );

        Ok(series.values().to_vec())
    }
}

/// Creates a CloudWatch client per request from the supplied credentials.
#[derive(Debug, Clone, Default)]
pub struct CloudWatchProvider;

#[async_trait]
impl BackendProvider for CloudWatchProvider {
    async fn connect(&self, region: &str, credentials: Credentials) -> Box<dyn MetricsBackend> {
        Box::new(CloudWatchBackend::new(region, credentials))
    }
}
