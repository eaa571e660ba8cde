use std::sync::Arc;

use tracing::{dispatcher, error, info};

use crate::{
    catalog,
    config::{DashboardConfig, RequestEnv},
    metrics::{MetricFetcher, MetricsBackend},
    models::{DashboardTables, MetricTable, ResourceCategory},
    storage::{Databases, PersistenceSink},
    table::TableBuilder,
};

/// Builds and stores the storage, database and compute tables, in that order.
///
/// Nothing here fails: fetch and persist errors are logged where they happen
/// and the affected data is simply missing from the result.
pub async fn collect_dashboard(
    backend: &dyn MetricsBackend,
    env: &RequestEnv,
    config: &DashboardConfig,
    databases: &Databases,
) -> DashboardTables {
    let fetcher = MetricFetcher::new(backend);
    let builder = TableBuilder::new(&fetcher, config.time_range);
    let sink = PersistenceSink::new(env.db_url.clone(), config.batch_size, databases.clone());

    let mut tables = DashboardTables::default();
    for category in ResourceCategory::ALL {
        info!(category = ?category, "Collecting metrics");
        let specs = catalog::metric_specs(category, env);
        let table = Arc::new(builder.build(&specs).await);

        store_blocking(&sink, Arc::clone(&table), category.destination()).await;

        *tables.get_mut(category) = Arc::try_unwrap(table).unwrap_or_else(|t| (*t).clone());
    }

    tables
}

// DuckDB I/O stays off the async workers; the caller's subscriber follows it.
async fn store_blocking(sink: &PersistenceSink, table: Arc<MetricTable>, destination: &'static str) {
    let sink = sink.clone();
    let dispatch = dispatcher::get_default(|d| d.clone());

    let joined = tokio::task::spawn_blocking(move || {
        dispatcher::with_default(&dispatch, || sink.store(&table, destination))
    })
    .await;

    if let Err(e) = joined {
        error!(destination = %destination, error = %e, "Storage task failed");
    }
}
