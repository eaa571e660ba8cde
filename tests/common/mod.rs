#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt::{self, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cloud_metrics_dashboard::{
    metrics::{BackendProvider, Credentials, MetricsBackend},
    models::{MetricQuery, MetricTable, TimeRange},
    DashboardError, Result,
};
use tracing::{
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_subscriber::layer::{Context, Layer};

/// Answers from a fixed `(namespace, metric)` table; unknown metrics get an
/// empty series, listed failures get a backend error.
#[derive(Clone, Default)]
pub struct FakeBackend {
    pub responses: HashMap<(String, String), Vec<f64>>,
    pub failures: Vec<String>,
}

impl FakeBackend {
    pub fn with_series(mut self, namespace: &str, metric: &str, values: Vec<f64>) -> Self {
        self.responses
            .insert((namespace.to_string(), metric.to_string()), values);
        self
    }

    pub fn failing(mut self, metric: &str) -> Self {
        self.failures.push(metric.to_string());
        self
    }
}

#[async_trait]
impl MetricsBackend for FakeBackend {
    async fn get_metric_data(&self, query: &MetricQuery, _range: &TimeRange) -> Result<Vec<f64>> {
        if self.failures.contains(&query.metric_name) {
            return Err(DashboardError::Backend(format!(
                "ValidationError for {}",
                query.metric_name
            )));
        }

        Ok(self
            .responses
            .get(&(query.namespace.clone(), query.metric_name.clone()))
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeProvider {
    pub backend: FakeBackend,
    pub connections: Mutex<Vec<(String, String)>>,
}

impl FakeProvider {
    pub fn new(backend: FakeBackend) -> Self {
        Self {
            backend,
            connections: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BackendProvider for FakeProvider {
    async fn connect(&self, region: &str, credentials: Credentials) -> Box<dyn MetricsBackend> {
        self.connections
            .lock()
            .unwrap()
            .push((region.to_string(), credentials.access_key_id));
        Box::new(self.backend.clone())
    }
}

/// Records every event as its level plus a `field=value` line.
#[derive(Clone, Default)]
pub struct CapturedEvents(Arc<Mutex<Vec<(Level, String)>>>);

impl CapturedEvents {
    pub fn errors_mentioning(&self, needle: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, line)| *level == Level::ERROR && line.contains(needle))
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == Level::ERROR)
            .count()
    }
}

struct LineVisitor(String);

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor(String::new());
        event.record(&mut visitor);
        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

pub fn column<'a>(table: &'a MetricTable, name: &str) -> Option<&'a [f64]> {
    table
        .columns()
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.values.as_slice())
}
