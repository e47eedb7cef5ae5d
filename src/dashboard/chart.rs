use serde::Serialize;

use crate::color::{sunset_gradient, ColorMap, Rgb};
use crate::data::aggregate::GroupTotal;
use crate::data::model::{Gender, GenderKey, YearMonth};

// ---------------------------------------------------------------------------
// Chart specification types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    HorizontalBar,
}

/// Binding of one axis to a data field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub field: &'static str,
    /// `None` hides the axis title.
    pub label: Option<String>,
    /// Currency prefix for monetary axes, e.g. `"Rp "`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_prefix: Option<String>,
}

impl AxisSpec {
    fn category(field: &'static str, label: Option<&str>) -> Self {
        AxisSpec {
            field,
            label: label.map(str::to_string),
            tick_prefix: None,
        }
    }

    fn money(field: &'static str, label: &str, prefix: &str) -> Self {
        AxisSpec {
            field,
            label: Some(label.to_string()),
            tick_prefix: Some(prefix.to_string()),
        }
    }
}

/// One bar or line vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    pub color: Rgb,
}

/// Everything a renderer needs to draw one chart.
///
/// `points` are in display order: left to right, or top to bottom for
/// [`ChartKind::HorizontalBar`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: &'static str,
    pub title: String,
    pub kind: ChartKind,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    /// Draw a marker on every line vertex.
    pub markers: bool,
    pub points: Vec<ChartPoint>,
}

impl ChartSpec {
    /// The axis carrying the measure.
    pub fn value_axis(&self) -> &AxisSpec {
        match self.kind {
            ChartKind::HorizontalBar => &self.x_axis,
            ChartKind::Bar | ChartKind::Line => &self.y_axis,
        }
    }
}

const SALES_FIELD: &str = "totalprice_rupiah";
const SALES_LABEL: &str = "Total Sales";

// ---------------------------------------------------------------------------
// Builders: one per aggregation
// ---------------------------------------------------------------------------

fn categorical_points(totals: &[GroupTotal<String, f64>]) -> Vec<ChartPoint> {
    let colors = ColorMap::new(totals.iter().map(|g| g.key.as_str()));
    totals
        .iter()
        .map(|g| ChartPoint {
            label: g.key.clone(),
            value: g.total,
            color: colors.color_for(&g.key),
        })
        .collect()
}

/// Bar chart of sales per category, one colour per category.
pub fn category_chart(totals: &[GroupTotal<String, f64>], currency: &str) -> ChartSpec {
    ChartSpec {
        id: "sales_by_category",
        title: "Total Sales by Product Category".to_string(),
        kind: ChartKind::Bar,
        x_axis: AxisSpec::category("category", None),
        y_axis: AxisSpec::money(SALES_FIELD, SALES_LABEL, currency),
        markers: false,
        points: categorical_points(totals),
    }
}

/// Line chart of monthly sales with markers.
pub fn monthly_trend_chart(totals: &[GroupTotal<YearMonth, f64>], currency: &str) -> ChartSpec {
    ChartSpec {
        id: "monthly_trend",
        title: "Total Sales over Time (Monthly)".to_string(),
        kind: ChartKind::Line,
        x_axis: AxisSpec::category("year_month", None),
        y_axis: AxisSpec::money(SALES_FIELD, SALES_LABEL, currency),
        markers: true,
        points: totals
            .iter()
            .map(|g| ChartPoint {
                label: g.key.to_string(),
                value: g.total,
                color: Rgb::TREND,
            })
            .collect(),
    }
}

/// Bar chart of sales per territory group, one colour per group.
pub fn territory_chart(totals: &[GroupTotal<String, f64>], currency: &str) -> ChartSpec {
    ChartSpec {
        id: "sales_by_territory",
        title: "Total Sales by Territory Group".to_string(),
        kind: ChartKind::Bar,
        x_axis: AxisSpec::category("territory_groups", None),
        y_axis: AxisSpec::money(SALES_FIELD, SALES_LABEL, currency),
        markers: false,
        points: categorical_points(totals),
    }
}

/// Horizontal bars of the best-selling products, best seller on top, shaded
/// along the sunset scale by quantity.
pub fn top_products_chart(totals: &[GroupTotal<String, u64>]) -> ChartSpec {
    let min = totals.iter().map(|g| g.total).min().unwrap_or(0);
    let max = totals.iter().map(|g| g.total).max().unwrap_or(0);
    let shade = |qty: u64| {
        if max == min {
            sunset_gradient(1.0)
        } else {
            sunset_gradient((qty - min) as f64 / (max - min) as f64)
        }
    };

    ChartSpec {
        id: "top_products",
        title: "Top Products by Quantity Sold".to_string(),
        kind: ChartKind::HorizontalBar,
        x_axis: AxisSpec::category("quantity", Some("Total Quantity Sold")),
        y_axis: AxisSpec::category("product_name", Some("Product")),
        markers: false,
        points: totals
            .iter()
            .map(|g| ChartPoint {
                label: g.key.clone(),
                value: g.total as f64,
                color: shade(g.total),
            })
            .collect(),
    }
}

/// Bar chart of sales per gender: `F` pink, `M` blue, missing gray.
pub fn gender_chart(totals: &[GroupTotal<GenderKey, f64>], currency: &str) -> ChartSpec {
    let colors = ColorMap::fixed(&[
        (Gender::Female.code(), Rgb::PINK),
        (Gender::Male.code(), Rgb::BLUE),
    ]);
    ChartSpec {
        id: "sales_by_gender",
        title: "Total Sales by Gender".to_string(),
        kind: ChartKind::Bar,
        x_axis: AxisSpec::category("gender", None),
        y_axis: AxisSpec::money(SALES_FIELD, SALES_LABEL, currency),
        markers: false,
        points: totals
            .iter()
            .map(|g| {
                let label = g.key.to_string();
                ChartPoint {
                    color: colors.color_for(&label),
                    label,
                    value: g.total,
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(pairs: &[(&str, f64)]) -> Vec<GroupTotal<String, f64>> {
        pairs
            .iter()
            .map(|(k, v)| GroupTotal {
                key: k.to_string(),
                total: *v,
            })
            .collect()
    }

    #[test]
    fn category_chart_keeps_order_and_colours_each_bar() {
        let spec = category_chart(&totals(&[("Bikes", 900.0), ("Accessories", 40.0)]), "Rp ");
        assert_eq!(spec.kind, ChartKind::Bar);
        let labels: Vec<&str> = spec.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["Bikes", "Accessories"]);
        assert_ne!(spec.points[0].color, spec.points[1].color);
        assert_eq!(spec.value_axis().tick_prefix.as_deref(), Some("Rp "));
    }

    #[test]
    fn top_products_axis_has_no_currency() {
        let spec = top_products_chart(&[
            GroupTotal { key: "Water Bottle".to_string(), total: 30 },
            GroupTotal { key: "Cap".to_string(), total: 10 },
        ]);
        assert_eq!(spec.kind, ChartKind::HorizontalBar);
        assert_eq!(spec.value_axis().field, "quantity");
        assert!(spec.value_axis().tick_prefix.is_none());
        assert_eq!(spec.points[0].color, sunset_gradient(1.0));
        assert_eq!(spec.points[1].color, sunset_gradient(0.0));
    }

    #[test]
    fn gender_chart_uses_fixed_colours() {
        let spec = gender_chart(
            &[
                GroupTotal { key: GenderKey::Known(Gender::Female), total: 5.0 },
                GroupTotal { key: GenderKey::Known(Gender::Male), total: 6.0 },
                GroupTotal { key: GenderKey::Missing, total: 7.0 },
            ],
            "Rp ",
        );
        let colors: Vec<Rgb> = spec.points.iter().map(|p| p.color).collect();
        assert_eq!(colors, [Rgb::PINK, Rgb::BLUE, Rgb::GRAY]);
        assert_eq!(spec.points[2].label, "<null>");
    }

    #[test]
    fn trend_is_a_line_with_markers() {
        let spec = monthly_trend_chart(
            &[GroupTotal { key: YearMonth::new(2021, 3), total: 12.0 }],
            "Rp ",
        );
        assert_eq!(spec.kind, ChartKind::Line);
        assert!(spec.markers);
        assert_eq!(spec.points[0].label, "2021-03");
        assert_eq!(spec.points[0].color, Rgb::TREND);
    }
}
