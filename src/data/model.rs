use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Sentinel written into `color` / `size_range` when the source cell is empty.
pub const NA_SENTINEL: &str = "NA";

/// Label for rows whose gender is missing. Gender is not normalized at load
/// time, so this is not [`NA_SENTINEL`].
pub const MISSING_LABEL: &str = "<null>";

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Customer gender as recorded in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Parse `M` / `F` (or `Male` / `Female`), ignoring case and surrounding
    /// whitespace. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f" | "female" => Some(Gender::Female),
            "m" | "male" => Some(Gender::Male),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Gender::Female => "F",
            Gender::Male => "M",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Group key for the gender breakdown. Missing gender is its own group and
/// sorts after the known values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenderKey {
    Known(Gender),
    Missing,
}

impl From<Option<Gender>> for GenderKey {
    fn from(value: Option<Gender>) -> Self {
        match value {
            Some(g) => GenderKey::Known(g),
            None => GenderKey::Missing,
        }
    }
}

impl fmt::Display for GenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenderKey::Known(g) => write!(f, "{g}"),
            GenderKey::Missing => f.write_str(MISSING_LABEL),
        }
    }
}

// ---------------------------------------------------------------------------
// YearMonth – monthly trend bucket
// ---------------------------------------------------------------------------

/// A calendar month. Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        YearMonth { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// SalesRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single order line.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub order_date: NaiveDate,
    pub territory_group: String,
    /// Line total in rupiah, never negative.
    pub total_price: f64,
    pub quantity: u64,
    /// Integer ids from the source are kept in their textual form.
    pub customer_id: String,
    pub category: String,
    pub product_name: String,
    pub gender: Option<Gender>,
    /// `"NA"` when missing in the source.
    pub color: String,
    /// `"NA"` when missing in the source.
    pub size_range: String,
}

impl SalesRecord {
    pub fn year_month(&self) -> YearMonth {
        YearMonth::of(self.order_date)
    }
}

// ---------------------------------------------------------------------------
// PriceRange
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` bounds over total price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        PriceRange { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed selector indices.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    /// All order lines, in file order.
    pub records: Vec<SalesRecord>,
    /// Distinct territory groups in first-encounter order.
    pub territory_groups: Vec<String>,
    /// Observed total price bounds; `None` for an empty dataset.
    pub price_bounds: Option<PriceRange>,
}

impl SalesDataset {
    /// Build selector indices from the loaded records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut territory_groups: Vec<String> = Vec::new();
        let mut price_bounds: Option<PriceRange> = None;

        for rec in &records {
            if !territory_groups.contains(&rec.territory_group) {
                territory_groups.push(rec.territory_group.clone());
            }
            price_bounds = Some(match price_bounds {
                None => PriceRange::new(rec.total_price, rec.total_price),
                Some(b) => PriceRange::new(b.min.min(rec.total_price), b.max.max(rec.total_price)),
            });
        }

        SalesDataset {
            records,
            territory_groups,
            price_bounds,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
