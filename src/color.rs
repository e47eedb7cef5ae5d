use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Rgb – renderer-independent colour
// ---------------------------------------------------------------------------

/// An 8-bit sRGB colour. Serializes as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const GRAY: Rgb = Rgb([128, 128, 128]);
    pub const PINK: Rgb = Rgb([255, 192, 203]);
    pub const BLUE: Rgb = Rgb([0, 0, 255]);
    /// Line colour of the monthly trend.
    pub const TREND: Rgb = Rgb([0x00, 0x83, 0xB8]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb([r, g, b])
    }

    pub fn hex(&self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    fn from_srgb(rgb: Srgb) -> Self {
        let rgb: Srgb<u8> = rgb.into_format();
        Rgb([rgb.red, rgb.green, rgb.blue])
    }

    fn to_linear(self) -> LinSrgb {
        let [r, g, b] = self.0;
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            Rgb::from_srgb(hsl.into_color())
        })
        .collect()
}

/// Stops of the light-yellow → purple "sunset" scale.
const SUNSET: [Rgb; 7] = [
    Rgb::new(243, 231, 155),
    Rgb::new(250, 196, 132),
    Rgb::new(248, 160, 126),
    Rgb::new(235, 127, 134),
    Rgb::new(206, 102, 147),
    Rgb::new(160, 89, 160),
    Rgb::new(92, 83, 165),
];

/// Sample the sunset scale at `t` in `[0, 1]` (clamped), blending adjacent
/// stops in linear RGB.
pub fn sunset_gradient(t: f64) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (SUNSET.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(SUNSET.len() - 2);
    let frac = (scaled - lower as f64) as f32;

    let mixed = SUNSET[lower].to_linear().mix(SUNSET[lower + 1].to_linear(), frac);
    Rgb::from_srgb(Srgb::from_linear(mixed))
}

// ---------------------------------------------------------------------------
// Color mapping: group label → Rgb
// ---------------------------------------------------------------------------

/// Maps the distinct labels of a chart's groups to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Rgb>,
    default_color: Rgb,
}

impl ColorMap {
    /// Build a colour map from labels. Colours are assigned in sorted label
    /// order, so the same set of labels always gets the same colours.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let unique: BTreeSet<&str> = labels.into_iter().collect();
        let palette = generate_palette(unique.len());
        let mapping = unique
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Rgb::GRAY,
        }
    }

    /// Start from fixed colours, e.g. `F` → pink.
    pub fn fixed(entries: &[(&str, Rgb)]) -> Self {
        ColorMap {
            mapping: entries
                .iter()
                .map(|(label, c)| (label.to_string(), *c))
                .collect(),
            default_color: Rgb::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Rgb {
        self.mapping.get(label).copied().unwrap_or(self.default_color)
    }
}
