use handlebars::Handlebars;
use serde::Serialize;

use crate::{
    Result,
    models::{DashboardTables, MetricTable, ResourceCategory, TimeRange},
};

const TEMPLATE_NAME: &str = "dashboard";
const TEMPLATE: &str = include_str!("../templates/dashboard.hbs");

#[derive(Debug, Serialize)]
struct TableView {
    title: &'static str,
    destination: &'static str,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableView {
    fn new(category: ResourceCategory, table: &MetricTable) -> Self {
        Self {
            title: category.title(),
            destination: category.destination(),
            columns: table.column_names().map(str::to_string).collect(),
            rows: table
                .rows()
                .map(|row| {
                    row.into_iter()
                        .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default())
                        .collect()
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PageView {
    start: String,
    end: String,
    tables: Vec<TableView>,
}

/// Handlebars renderer for the dashboard page. HTML escaping stays on.
pub struct DashboardRenderer {
    registry: Handlebars<'static>,
}

impl DashboardRenderer {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_template_string(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { registry })
    }

    pub fn render(&self, tables: &DashboardTables, range: &TimeRange) -> Result<String> {
        let page = PageView {
            start: range.start.to_rfc3339(),
            end: range.end.to_rfc3339(),
            tables: ResourceCategory::ALL
                .iter()
                .map(|&category| TableView::new(category, tables.get(category)))
                .collect(),
        };

        Ok(self.registry.render(TEMPLATE_NAME, &page)?)
    }
}
