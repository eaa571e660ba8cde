use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, Mutex};

use duckdb::{params_from_iter, Connection};
use tracing::{debug, error, info};

use crate::{
    BestEffort,
    DashboardError,
    Result,
    models::MetricTable,
};

/// Row counts of the batches written by one `store` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StoreReport {
    pub rows: usize,
    pub batches: Vec<usize>,
}

/// DuckDB instances opened by this process, one per `DB_URL`.
///
/// Every caller gets its own connection cloned from the shared instance, and
/// writers go through one at a time. Opening the same file twice in one
/// process gives two instances that overwrite each other's WAL.
#[derive(Clone, Default)]
pub struct Databases {
    instances: Arc<Mutex<HashMap<String, Connection>>>,
}

impl Databases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` on a fresh connection to the instance at `db_url`, holding the
    /// write gate for the duration. A failed open is not remembered.
    pub fn with_connection<T>(
        &self,
        db_url: &str,
        f: impl FnOnce(&mut Connection) -> Result<T>,
    ) -> Result<T> {
        let mut instances = self
            .instances
            .lock()
            .map_err(|_| DashboardError::Internal("database registry lock poisoned".to_string()))?;

        let mut conn = match instances.get(db_url) {
            Some(instance) => instance.try_clone()?,
            None => {
                let instance = Connection::open(db_url)?;
                let conn = instance.try_clone()?;
                debug!(db_url = %db_url, "Opened database instance");
                instances.insert(db_url.to_string(), instance);
                conn
            }
        };

        f(&mut conn)
    }
}

/// Appends metric tables to DuckDB, using a new connection per call.
#[derive(Clone)]
pub struct PersistenceSink {
    db_url: Option<String>,
    batch_size: usize,
    databases: Databases,
}

impl PersistenceSink {
    pub fn new(db_url: Option<String>, batch_size: usize, databases: Databases) -> Self {
        Self {
            db_url,
            batch_size: batch_size.max(1),
            databases,
        }
    }

    /// Writes `table` to `destination`, logging and discarding any failure.
    pub fn store(&self, table: &MetricTable, destination: &str) {
        let outcome = BestEffort::from_result(self.try_store(table, destination));
        if let Some(e) = &outcome.error {
            error!(destination = %destination, error = %e, "Error storing data in database");
        }
    }

    /// Batches already committed stay committed when a later batch fails.
    pub(crate) fn try_store(&self, table: &MetricTable, destination: &str) -> Result<StoreReport> {
        let db_url = self
            .db_url
            .as_deref()
            .ok_or_else(|| DashboardError::Config("DB_URL is not set".to_string()))?;

        self.databases
            .with_connection(db_url, |conn| self.append(conn, table, destination))
    }

    fn append(&self, conn: &mut Connection, table: &MetricTable, destination: &str) -> Result<StoreReport> {
        let columns: Vec<String> = table.column_names().map(quote_identifier).collect();
        if columns.is_empty() {
            info!(destination = %destination, "No columns to store");
            return Ok(StoreReport::default());
        }

        let table_name = quote_identifier(destination);
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            table_name,
            columns
                .iter()
                .map(|c| format!("{} DOUBLE", c))
                .collect::<Vec<_>>()
                .join(", ")
        ))?;

        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table_name,
            columns.join(", "),
            vec!["?"; columns.len()].join(", ")
        );

        let mut report = StoreReport::default();
        for batch in batch_bounds(table.row_count(), self.batch_size) {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(&insert)?;
                for index in batch.clone() {
                    stmt.execute(params_from_iter(table.row(index)))?;
                }
            }
            tx.commit()?;

            debug!(destination = %destination, rows = batch.len(), "Appended batch");
            report.rows += batch.len();
            report.batches.push(batch.len());
        }

        info!(
            destination = %destination,
            rows = report.rows,
            batches = report.batches.len(),
            "Data stored in database table"
        );
        Ok(report)
    }
}

/// Splits `rows` into consecutive ranges of at most `batch_size`.
pub fn batch_bounds(rows: usize, batch_size: usize) -> Vec<Range<usize>> {
    let batch_size = batch_size.max(1);
    (0..rows)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(rows))
        .collect()
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
