use bee_cycle_dashboard::data::model::MISSING_LABEL;
use bee_cycle_dashboard::format::format_currency;
use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const HEADERS: [&str; 9] = [
    "Order date",
    "Territory group",
    "Category",
    "Product",
    "Qty",
    "Total price",
    "Gender",
    "Color",
    "Size",
];

/// Collapsible table of the rows passing the current filters.
pub fn filtered_rows(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let total = state.visible_indices.len();
    let shown = total.min(state.config.table_preview_rows);
    let prefix = state.config.currency_prefix.as_str();

    egui::CollapsingHeader::new(format!("Filtered data ({shown} of {total} rows)"))
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(320.0)
                .columns(Column::auto(), HEADERS.len() - 1)
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    for title in HEADERS {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, shown, |mut row| {
                        let rec = &dataset.records[state.visible_indices[row.index()]];
                        let cells = [
                            rec.order_date.to_string(),
                            rec.territory_group.clone(),
                            rec.category.clone(),
                            rec.product_name.clone(),
                            rec.quantity.to_string(),
                            format_currency(prefix, rec.total_price),
                            rec.gender
                                .map(|g| g.to_string())
                                .unwrap_or_else(|| MISSING_LABEL.to_string()),
                            rec.color.clone(),
                            rec.size_range.clone(),
                        ];
                        for cell in cells {
                            row.col(|ui| {
                                ui.label(&cell);
                            });
                        }
                    });
                });
        });
}
