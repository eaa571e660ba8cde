use chrono::{DateTime, Utc};

use crate::config::{PERIOD_SECONDS, STATISTIC};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One entry of a category's metric catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: String,
    pub namespace: String,
    pub dimensions: Vec<Dimension>,
}

impl MetricSpec {
    pub fn new(name: &str, namespace: &str, dimensions: Vec<Dimension>) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            dimensions,
        }
    }
}

/// A single-series metrics query over one hour buckets of the average.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricQuery {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<Dimension>,
    pub period_seconds: i32,
    pub statistic: String,
}

impl MetricQuery {
    pub fn new(namespace: &str, metric_name: &str, dimensions: &[Dimension]) -> Self {
        Self {
            namespace: namespace.to_string(),
            metric_name: metric_name.to_string(),
            dimensions: dimensions.to_vec(),
            period_seconds: PERIOD_SECONDS,
            statistic: STATISTIC.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCategory {
    Storage,
    Database,
    Compute,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 3] = [
        ResourceCategory::Storage,
        ResourceCategory::Database,
        ResourceCategory::Compute,
    ];

    /// Destination table the category's rows are appended to.
    pub fn destination(&self) -> &'static str {
        match self {
            Self::Storage => "s3_metrics",
            Self::Database => "rds_metrics",
            Self::Compute => "ec2_metrics",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Storage => "S3 Metrics",
            Self::Database => "RDS Metrics",
            Self::Compute => "EC2 Metrics",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Column-oriented table keyed by metric name, in insertion order.
///
/// Columns are not aligned on timestamps and may differ in length. Row views
/// pad short columns with `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    columns: Vec<MetricColumn>,
}

impl MetricTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the column in place when `name` is already present.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        let name = name.into();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.values = values,
            None => self.columns.push(MetricColumn { name, values }),
        }
    }

    pub fn columns(&self) -> &[MetricColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    pub fn is_jagged(&self) -> bool {
        let mut lengths = self.columns.iter().map(|c| c.values.len());
        match lengths.next() {
            Some(first) => lengths.any(|len| len != first),
            None => false,
        }
    }

    pub fn row(&self, index: usize) -> Vec<Option<f64>> {
        self.columns
            .iter()
            .map(|c| c.values.get(index).copied())
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<f64>>> + '_ {
        (0..self.row_count()).map(move |i| self.row(i))
    }
}

#[cfg(test)]
impl MetricTable {
    pub(crate) fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }
}

/// The three category tables gathered by one page request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardTables {
    pub storage: MetricTable,
    pub database: MetricTable,
    pub compute: MetricTable,
}

impl DashboardTables {
    pub fn get(&self, category: ResourceCategory) -> &MetricTable {
        match category {
            ResourceCategory::Storage => &self.storage,
            ResourceCategory::Database => &self.database,
            ResourceCategory::Compute => &self.compute,
        }
    }

    pub fn get_mut(&mut self, category: ResourceCategory) -> &mut MetricTable {
        match category {
            ResourceCategory::Storage => &mut self.storage,
            ResourceCategory::Database => &mut self.database,
            ResourceCategory::Compute => &mut self.compute,
        }
    }
}
