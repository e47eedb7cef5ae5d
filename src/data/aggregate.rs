use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;
use std::ops::AddAssign;

use indexmap::IndexMap;

use super::filter::FilteredView;
use super::model::{GenderKey, SalesRecord, YearMonth};

/// How many products the top-products chart shows by default.
pub const TOP_PRODUCTS: usize = 10;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One row of an aggregation table: a group key and its summed measure.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal<K, V> {
    pub key: K,
    pub total: V,
}

/// Headline numbers for the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub total_sales: f64,
    pub total_quantity: u64,
    pub unique_customers: usize,
    /// Number of order lines in the view.
    pub orders: usize,
}

/// Every aggregation the dashboard shows, computed from one filtered view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SalesReport {
    pub summary: Summary,
    pub by_category: Vec<GroupTotal<String, f64>>,
    pub monthly: Vec<GroupTotal<YearMonth, f64>>,
    pub by_territory: Vec<GroupTotal<String, f64>>,
    pub top_products: Vec<GroupTotal<String, u64>>,
    pub by_gender: Vec<GroupTotal<GenderKey, f64>>,
}

/// Run all reductions over `view`.
pub fn build_report(view: &FilteredView<'_>, top_n: usize) -> SalesReport {
    SalesReport {
        summary: summarize(view),
        by_category: sales_by_category(view),
        monthly: monthly_trend(view),
        by_territory: sales_by_territory(view),
        top_products: top_products_by_quantity(view, top_n),
        by_gender: sales_by_gender(view),
    }
}

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------

/// Sum of sales and quantity, and the number of distinct customers.
pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let mut customers: HashSet<&str> = HashSet::new();
    let mut summary = Summary::default();
    for rec in view.records() {
        summary.total_sales += rec.total_price;
        summary.total_quantity += rec.quantity;
        summary.orders += 1;
        customers.insert(&rec.customer_id);
    }
    summary.unique_customers = customers.len();
    summary
}

/// Sales per category, largest first.
pub fn sales_by_category(view: &FilteredView<'_>) -> Vec<GroupTotal<String, f64>> {
    let mut totals = owned(group_sum(view, |r| r.category.as_str(), |r| r.total_price));
    sort_descending(&mut totals);
    totals
}

/// Sales per calendar month, oldest first.
pub fn monthly_trend(view: &FilteredView<'_>) -> Vec<GroupTotal<YearMonth, f64>> {
    let mut totals: Vec<_> = group_sum(view, SalesRecord::year_month, |r| r.total_price)
        .into_iter()
        .map(|(key, total)| GroupTotal { key, total })
        .collect();
    totals.sort_by_key(|g| g.key);
    totals
}

/// Sales per territory group, largest first.
pub fn sales_by_territory(view: &FilteredView<'_>) -> Vec<GroupTotal<String, f64>> {
    let mut totals = owned(group_sum(view, |r| r.territory_group.as_str(), |r| r.total_price));
    sort_descending(&mut totals);
    totals
}

/// The `n` products with the highest summed quantity. Equal quantities keep
/// the order in which the products first appear in the view.
pub fn top_products_by_quantity(view: &FilteredView<'_>, n: usize) -> Vec<GroupTotal<String, u64>> {
    let mut totals = owned(group_sum(view, |r| r.product_name.as_str(), |r| r.quantity));
    sort_descending(&mut totals);
    totals.truncate(n);
    totals
}

/// Sales per gender: `F`, `M`, then rows without a recorded gender.
pub fn sales_by_gender(view: &FilteredView<'_>) -> Vec<GroupTotal<GenderKey, f64>> {
    let mut totals: Vec<_> = group_sum(view, |r| GenderKey::from(r.gender), |r| r.total_price)
        .into_iter()
        .map(|(key, total)| GroupTotal { key, total })
        .collect();
    totals.sort_by_key(|g| g.key);
    totals
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Group records by `key` and sum `measure`. Groups stay in first-encounter
/// order, which is what makes the stable sorts below deterministic.
fn group_sum<'a, K, V>(
    view: &FilteredView<'a>,
    key: impl Fn(&'a SalesRecord) -> K,
    measure: impl Fn(&SalesRecord) -> V,
) -> IndexMap<K, V>
where
    K: Hash + Eq,
    V: AddAssign + Default,
{
    let mut groups: IndexMap<K, V> = IndexMap::new();
    for rec in view.records() {
        *groups.entry(key(rec)).or_default() += measure(rec);
    }
    groups
}

fn owned<V>(groups: IndexMap<&str, V>) -> Vec<GroupTotal<String, V>> {
    groups
        .into_iter()
        .map(|(key, total)| GroupTotal {
            key: key.to_string(),
            total,
        })
        .collect()
}

/// Stable sort, largest total first.
fn sort_descending<K, V: PartialOrd>(totals: &mut [GroupTotal<K, V>]) {
    totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
}
