//! Headless rendering of the dashboard: load, filter, aggregate and print
//! the chart specifications as JSON.
//!
//! Usage: `sales_report [DATA_FILE]`
//! Filters come from `BEE_CYCLE_REGION`, `BEE_CYCLE_MIN_PRICE` and
//! `BEE_CYCLE_MAX_PRICE`; unset variables leave that filter open.

use std::io::Write;

use anyhow::{Context, Result};
use bee_cycle_dashboard::config::{env_f64, DashboardConfig};
use bee_cycle_dashboard::dashboard::build_dashboard;
use bee_cycle_dashboard::data::aggregate::build_report;
use bee_cycle_dashboard::data::filter::{apply_filters, FilterCriteria, RegionSelection};
use bee_cycle_dashboard::data::loader::load_cached;

const REGION_ENV: &str = "BEE_CYCLE_REGION";
const MIN_PRICE_ENV: &str = "BEE_CYCLE_MIN_PRICE";
const MAX_PRICE_ENV: &str = "BEE_CYCLE_MAX_PRICE";

fn main() -> Result<()> {
    env_logger::init();

    let config =
        DashboardConfig::resolve(std::env::args()).context("loading dashboard configuration")?;
    let dataset = load_cached(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    let mut criteria = FilterCriteria::unfiltered(&dataset);
    if let Ok(region) = std::env::var(REGION_ENV) {
        criteria.region = RegionSelection::from_label(&region);
    }
    if let Some(min) = env_f64(MIN_PRICE_ENV)? {
        criteria.price.min = min;
    }
    if let Some(max) = env_f64(MAX_PRICE_ENV)? {
        criteria.price.max = max;
    }

    let view = apply_filters(&dataset, &criteria);
    log::info!(
        "Region '{}', price [{}, {}]: {} of {} rows",
        criteria.region,
        criteria.price.min,
        criteria.price.max,
        view.len(),
        dataset.len()
    );

    let report = build_report(&view, config.top_products);
    let dashboard = build_dashboard(&report, &config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &dashboard).context("writing dashboard JSON")?;
    writeln!(out)?;
    Ok(())
}
