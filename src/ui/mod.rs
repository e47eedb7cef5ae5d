pub mod panels;
pub mod plot;
pub mod table;

use bee_cycle_dashboard::color::Rgb;
use eframe::egui::Color32;

pub fn to_color32(rgb: Rgb) -> Color32 {
    let [r, g, b] = rgb.0;
    Color32::from_rgb(r, g, b)
}
