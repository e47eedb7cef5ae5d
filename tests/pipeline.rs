use std::io::Write;

use bee_cycle_dashboard::config::DashboardConfig;
use bee_cycle_dashboard::dashboard::{build_dashboard, ChartKind};
use bee_cycle_dashboard::data::aggregate::{
    build_report, monthly_trend, sales_by_category, sales_by_gender, sales_by_territory, summarize,
    top_products_by_quantity, TOP_PRODUCTS,
};
use bee_cycle_dashboard::data::filter::{apply_filters, FilterCriteria, RegionSelection};
use bee_cycle_dashboard::data::loader::load_file;
use bee_cycle_dashboard::data::model::{PriceRange, SalesDataset};
use tempfile::NamedTempFile;

const HEADER: &str = "order_date,territory_groups,totalprice_rupiah,quantity,customer_id,category,product_name,gender,color,size_range";

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(tmp, "{HEADER}").unwrap();
    for row in rows {
        writeln!(tmp, "{row}").unwrap();
    }
    tmp
}

/// East/West example: (East, 100, 2, A), (West, 200, 5, B), (East, 50, 1, A).
fn three_rows() -> SalesDataset {
    let tmp = write_csv(&[
        "2021-01-10,East,100,2,1,Accessories,A,M,,",
        "2021-02-10,West,200,5,2,Bikes,B,F,Red,L",
        "2021-03-10,East,50,1,3,Accessories,A,,,",
    ]);
    load_file(tmp.path()).unwrap()
}

/// A larger dataset with a dozen products, several months and regions.
fn varied_rows() -> SalesDataset {
    let mut rows = Vec::new();
    let regions = ["Europe", "North America", "Pacific"];
    let genders = ["M", "F", ""];
    for i in 0..60u32 {
        rows.push(format!(
            "2021-{:02}-{:02},{},{},{},{},{},P{},{},,",
            1 + i % 12,
            1 + i % 28,
            regions[(i % 3) as usize],
            1000 + (i * 37) % 500,
            1 + i % 4,
            100 + i % 17,
            ["Bikes", "Clothing", "Accessories"][(i % 5 % 3) as usize],
            i % 13,
            genders[(i % 7 % 3) as usize],
        ));
    }
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let tmp = write_csv(&refs);
    load_file(tmp.path()).unwrap()
}

fn criteria(region: &str, min: f64, max: f64) -> FilterCriteria {
    FilterCriteria {
        region: RegionSelection::from_label(region),
        price: PriceRange::new(min, max),
    }
}

#[test]
fn east_region_example() {
    let ds = three_rows();
    let view = apply_filters(&ds, &criteria("East", 0.0, 1000.0));
    assert_eq!(view.len(), 2);

    let summary = summarize(&view);
    assert_eq!(summary.total_sales, 150.0);

    let products = top_products_by_quantity(&view, TOP_PRODUCTS);
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].key, "A");
    assert_eq!(products[0].total, 3);
}

#[test]
fn price_range_example_keeps_first_row_only() {
    let ds = three_rows();
    let view = apply_filters(&ds, &criteria("All", 60.0, 150.0));
    assert_eq!(view.indices(), &[0]);
}

#[test]
fn every_filtered_row_satisfies_both_predicates() {
    let ds = varied_rows();
    for region in ["All", "Europe", "Pacific", "Nowhere"] {
        for (min, max) in [(0.0, 1e9), (1100.0, 1300.0), (1250.0, 1250.0), (2000.0, 10.0)] {
            let c = criteria(region, min, max);
            let view = apply_filters(&ds, &c);
            assert!(view.len() <= ds.len());
            for rec in view.records() {
                assert!(c.region.matches(&rec.territory_group));
                assert!(min <= rec.total_price && rec.total_price <= max);
            }
            // Nothing that matches was dropped.
            let expected = ds.records.iter().filter(|r| c.matches(r)).count();
            assert_eq!(view.len(), expected);
        }
    }
}

#[test]
fn filtering_is_idempotent() {
    let ds = varied_rows();
    let c = criteria("North America", 1100.0, 1400.0);
    let once = apply_filters(&ds, &c);
    let twice = once.refine(&c);
    assert_eq!(once.indices(), twice.indices());
}

#[test]
fn group_totals_conserve_the_view_total() {
    let ds = varied_rows();
    let view = apply_filters(&ds, &criteria("All", 1100.0, 1450.0));
    let summary = summarize(&view);

    let sum = |totals: Vec<f64>| totals.into_iter().sum::<f64>();
    let close = |a: f64, b: f64| (a - b).abs() < 1e-6;

    assert!(close(sum(sales_by_category(&view).into_iter().map(|g| g.total).collect()), summary.total_sales));
    assert!(close(sum(monthly_trend(&view).into_iter().map(|g| g.total).collect()), summary.total_sales));
    assert!(close(sum(sales_by_territory(&view).into_iter().map(|g| g.total).collect()), summary.total_sales));
    assert!(close(sum(sales_by_gender(&view).into_iter().map(|g| g.total).collect()), summary.total_sales));

    let all_products = top_products_by_quantity(&view, usize::MAX);
    assert_eq!(all_products.iter().map(|g| g.total).sum::<u64>(), summary.total_quantity);
}

#[test]
fn top_products_are_capped_and_sorted() {
    let ds = varied_rows();
    let view = apply_filters(&ds, &FilterCriteria::unfiltered(&ds));
    let top = top_products_by_quantity(&view, TOP_PRODUCTS);

    let distinct: std::collections::HashSet<&str> =
        view.records().map(|r| r.product_name.as_str()).collect();
    assert_eq!(top.len(), TOP_PRODUCTS.min(distinct.len()));
    assert!(top.windows(2).all(|w| w[0].total >= w[1].total));
}

#[test]
fn descending_aggregations_are_sorted() {
    let ds = varied_rows();
    let view = apply_filters(&ds, &FilterCriteria::unfiltered(&ds));
    let cats = sales_by_category(&view);
    assert!(cats.windows(2).all(|w| w[0].total >= w[1].total));
    let terr = sales_by_territory(&view);
    assert!(terr.windows(2).all(|w| w[0].total >= w[1].total));
    let months = monthly_trend(&view);
    assert!(months.windows(2).all(|w| w[0].key < w[1].key));
}

#[test]
fn repeated_runs_produce_identical_reports() {
    let ds = varied_rows();
    let c = criteria("All", 1000.0, 1500.0);
    let a = build_report(&apply_filters(&ds, &c), TOP_PRODUCTS);
    let b = build_report(&apply_filters(&ds, &c), TOP_PRODUCTS);
    assert_eq!(a, b);
}

#[test]
fn empty_view_produces_zero_metrics_and_empty_charts() {
    let ds = three_rows();
    let view = apply_filters(&ds, &criteria("All", 500.0, 900.0));
    assert!(view.is_empty());

    let report = build_report(&view, TOP_PRODUCTS);
    assert_eq!(report.summary.total_sales, 0.0);
    assert_eq!(report.summary.total_quantity, 0);
    assert_eq!(report.summary.unique_customers, 0);

    let dashboard = build_dashboard(&report, &DashboardConfig::default());
    assert_eq!(dashboard.charts.len(), 5);
    assert!(dashboard.charts.iter().all(|c| c.points.is_empty()));
}

#[test]
fn dashboard_maps_each_aggregation_to_one_chart() {
    let ds = three_rows();
    let view = apply_filters(&ds, &FilterCriteria::unfiltered(&ds));
    let dashboard = build_dashboard(&build_report(&view, TOP_PRODUCTS), &DashboardConfig::default());

    let kinds: Vec<ChartKind> = dashboard.charts.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        [
            ChartKind::Bar,
            ChartKind::Line,
            ChartKind::Bar,
            ChartKind::HorizontalBar,
            ChartKind::Bar
        ]
    );
    let values: Vec<&str> = dashboard.metrics.iter().map(|m| m.value.as_str()).collect();
    assert_eq!(values, ["Rp 350", "8", "3"]);

    let gender = &dashboard.charts[4];
    let labels: Vec<&str> = gender.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, ["F", "M", "<null>"]);
}
