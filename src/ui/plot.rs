use std::ops::RangeInclusive;

use bee_cycle_dashboard::dashboard::{ChartKind, ChartSpec};
use bee_cycle_dashboard::format::format_thousands;
use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

use super::to_color32;

// ---------------------------------------------------------------------------
// Chart rendering (central panel)
// ---------------------------------------------------------------------------

/// Render one chart specification.
pub fn chart(ui: &mut Ui, spec: &ChartSpec) {
    ui.strong(&spec.title);
    if spec.points.is_empty() {
        ui.label("No data for the current filters.");
        return;
    }

    let labels: Vec<String> = spec.points.iter().map(|p| p.label.clone()).collect();
    let prefix = spec.value_axis().tick_prefix.clone().unwrap_or_default();

    let mut plot = Plot::new(spec.id)
        .height(280.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false);
    if let Some(label) = &spec.x_axis.label {
        plot = plot.x_axis_label(label.clone());
    }
    if let Some(label) = &spec.y_axis.label {
        plot = plot.y_axis_label(label.clone());
    }

    match spec.kind {
        ChartKind::Bar => {
            let bars: Vec<Bar> = spec
                .points
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    Bar::new(i as f64, p.value)
                        .name(&p.label)
                        .fill(to_color32(p.color))
                        .width(0.7)
                })
                .collect();
            plot.x_axis_formatter(category_formatter(labels, false))
                .y_axis_formatter(value_formatter(prefix))
                .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
        }
        ChartKind::HorizontalBar => {
            // First point is drawn on top.
            let n = spec.points.len();
            let bars: Vec<Bar> = spec
                .points
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    Bar::new((n - 1 - i) as f64, p.value)
                        .name(&p.label)
                        .fill(to_color32(p.color))
                        .width(0.7)
                })
                .collect();
            plot.y_axis_formatter(category_formatter(labels, true))
                .x_axis_formatter(value_formatter(prefix))
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).horizontal())
                });
        }
        ChartKind::Line => {
            let vertices: Vec<[f64; 2]> = spec
                .points
                .iter()
                .enumerate()
                .map(|(i, p)| [i as f64, p.value])
                .collect();
            let color = spec
                .points
                .first()
                .map(|p| to_color32(p.color))
                .unwrap_or_default();
            let markers = spec.markers;
            plot.x_axis_formatter(category_formatter(labels, false))
                .y_axis_formatter(value_formatter(prefix))
                .show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new(PlotPoints::from(vertices.clone()))
                            .color(color)
                            .width(2.0),
                    );
                    if markers {
                        plot_ui.points(Points::new(PlotPoints::from(vertices)).color(color).radius(4.0));
                    }
                });
        }
    }
}

/// Label integer grid marks with the group label at that position.
fn category_formatter(
    labels: Vec<String>,
    reversed: bool,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let v = mark.value;
        if v < 0.0 || (v - v.round()).abs() > 1e-6 {
            return String::new();
        }
        let pos = v.round() as usize;
        let idx = if reversed {
            match labels.len().checked_sub(pos + 1) {
                Some(i) => i,
                None => return String::new(),
            }
        } else {
            pos
        };
        labels.get(idx).cloned().unwrap_or_default()
    }
}

/// Currency-prefixed (or plain) thousands-separated ticks.
fn value_formatter(prefix: String) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| format!("{prefix}{}", format_thousands(mark.value))
}
