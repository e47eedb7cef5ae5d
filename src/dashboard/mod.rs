//! Presentation adapter: turns a [`SalesReport`] into metric and chart
//! specifications. Rendering happens elsewhere (egui in the desktop binary,
//! JSON in `sales_report`).

pub mod chart;

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::data::aggregate::{SalesReport, Summary};
use crate::format::{format_count, format_currency};

pub use chart::{AxisSpec, ChartKind, ChartPoint, ChartSpec};

/// A headline number, already formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSpec {
    pub label: &'static str,
    pub value: String,
}

/// The complete dashboard for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSpec {
    pub title: String,
    /// Order lines behind the numbers.
    pub rows: usize,
    pub metrics: Vec<MetricSpec>,
    pub charts: Vec<ChartSpec>,
}

/// Total sales, total quantity and unique customers.
pub fn summary_metrics(summary: &Summary, currency: &str) -> Vec<MetricSpec> {
    vec![
        MetricSpec {
            label: "Total Sales",
            value: format_currency(currency, summary.total_sales),
        },
        MetricSpec {
            label: "Total Quantity",
            value: format_count(summary.total_quantity),
        },
        MetricSpec {
            label: "Unique Customers",
            value: format_count(summary.unique_customers as u64),
        },
    ]
}

/// One chart per aggregation, in dashboard order.
pub fn build_dashboard(report: &SalesReport, config: &DashboardConfig) -> DashboardSpec {
    let currency = config.currency_prefix.as_str();
    DashboardSpec {
        title: config.title.clone(),
        rows: report.summary.orders,
        metrics: summary_metrics(&report.summary, currency),
        charts: vec![
            chart::category_chart(&report.by_category, currency),
            chart::monthly_trend_chart(&report.monthly, currency),
            chart::territory_chart(&report.by_territory, currency),
            chart::top_products_chart(&report.top_products),
            chart::gender_chart(&report.by_gender, currency),
        ],
    }
}
