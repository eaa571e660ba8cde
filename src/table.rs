use tracing::{info, warn};

use crate::{
    metrics::MetricFetcher,
    models::{MetricSpec, MetricTable, TimeRange},
};

/// Assembles one category's table, one fetch per spec, in list order.
pub struct TableBuilder<'a> {
    fetcher: &'a MetricFetcher<'a>,
    range: TimeRange,
}

impl<'a> TableBuilder<'a> {
    pub fn new(fetcher: &'a MetricFetcher<'a>, range: TimeRange) -> Self {
        Self { fetcher, range }
    }

    pub async fn build(&self, specs: &[MetricSpec]) -> MetricTable {
        let mut table = MetricTable::new();

        for spec in specs {
            let values = self
                .fetcher
                .fetch(&spec.namespace, &spec.name, &spec.dimensions, &self.range)
                .await;
            table.insert(spec.name.clone(), values);
        }

        if table.is_jagged() {
            let lengths: Vec<String> = table
                .columns()
                .iter()
                .map(|c| format!("{}={}", c.name, c.values.len()))
                .collect();
            warn!(lengths = %lengths.join(","), "Metric columns differ in length, padding short columns");
        }

        info!(columns = specs.len(), rows = table.row_count(), "Built metric table");
        table
    }
}
