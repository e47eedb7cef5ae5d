use bee_cycle_dashboard::dashboard::MetricSpec;
use bee_cycle_dashboard::data::filter::region_options;
use bee_cycle_dashboard::format::format_currency;
use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (Some(dataset), Some(criteria)) = (&state.dataset, &state.criteria) else {
        ui.label("No dataset loaded.");
        return;
    };

    // Copy what we need so we can mutate state below.
    let options = region_options(dataset);
    let bounds = dataset.price_bounds;
    let current_region = criteria.region.label().to_string();
    let mut price = criteria.price;
    let prefix = state.config.currency_prefix.clone();

    // ---- Territory group selector ----
    ui.strong("Territory group");
    let mut picked: Option<String> = None;
    egui::ComboBox::from_id_salt("territory_group")
        .selected_text(&current_region)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for opt in &options {
                if ui.selectable_label(current_region == *opt, opt).clicked() {
                    picked = Some(opt.clone());
                }
            }
        });
    ui.add_space(8.0);

    // ---- Total price range ----
    ui.strong("Total price range");
    let mut price_changed = false;
    if let Some(bounds) = bounds {
        let fmt = |v: f64, _: std::ops::RangeInclusive<usize>| format_currency(&prefix, v);
        price_changed |= ui
            .add(Slider::new(&mut price.min, bounds.min..=bounds.max).text("min").custom_formatter(fmt))
            .changed();
        price_changed |= ui
            .add(Slider::new(&mut price.max, bounds.min..=bounds.max).text("max").custom_formatter(fmt))
            .changed();
        if price.min > price.max {
            ui.label(RichText::new("Min is above max: no rows match.").color(Color32::YELLOW));
        }
    } else {
        ui.label("Dataset is empty.");
    }
    ui.add_space(8.0);

    let reset = ui.button("Reset filters").clicked();

    if let Some(label) = picked {
        state.set_region(&label);
    }
    if price_changed {
        if let Some(criteria) = &mut state.criteria {
            criteria.price = price;
        }
        state.refilter();
    }
    if reset {
        state.reset_filters();
    }
}

// ---------------------------------------------------------------------------
// Central panel pieces
// ---------------------------------------------------------------------------

/// Three metric tiles side by side.
pub fn metric_tiles(ui: &mut Ui, metrics: &[MetricSpec]) {
    ui.columns(metrics.len().max(1), |cols: &mut [Ui]| {
        for (col, metric) in cols.iter_mut().zip(metrics) {
            col.vertical(|ui: &mut Ui| {
                ui.label(metric.label);
                ui.label(RichText::new(&metric.value).size(24.0).strong());
            });
        }
    });
}

/// Shown instead of the dashboard when no dataset could be loaded.
pub fn load_error(ui: &mut Ui, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| {
        match &state.status_message {
            Some(msg) => ui.label(
                RichText::new(format!("{msg}\n\nOpen another file via File → Open…"))
                    .color(Color32::RED)
                    .heading(),
            ),
            None => ui.heading("Open a sales file to start  (File → Open…)"),
        };
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} after filters",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["xlsx", "xls", "csv", "json", "parquet", "pq"])
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
        if let Some(ds) = &state.dataset {
            log::info!(
                "Showing {} with {} rows and territory groups {:?}",
                path.display(),
                ds.len(),
                ds.territory_groups
            );
        }
    }
}
