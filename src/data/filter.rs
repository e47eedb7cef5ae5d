use std::fmt;

use super::model::{PriceRange, SalesDataset, SalesRecord};

/// Label of the "no region filter" entry in the region selector.
pub const ALL_REGIONS: &str = "All";

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Region selector state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionSelection {
    #[default]
    All,
    /// Exact, case-sensitive territory group.
    Group(String),
}

impl RegionSelection {
    /// Map a selector label to a selection; [`ALL_REGIONS`] is the wildcard.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_REGIONS {
            RegionSelection::All
        } else {
            RegionSelection::Group(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RegionSelection::All => ALL_REGIONS,
            RegionSelection::Group(g) => g,
        }
    }

    pub fn matches(&self, territory_group: &str) -> bool {
        match self {
            RegionSelection::All => true,
            RegionSelection::Group(g) => g == territory_group,
        }
    }
}

impl fmt::Display for RegionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user picked in the sidebar. Rebuilt on every interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub region: RegionSelection,
    pub price: PriceRange,
}

impl FilterCriteria {
    /// All regions and the full observed price range (i.e., show everything).
    pub fn unfiltered(dataset: &SalesDataset) -> Self {
        FilterCriteria {
            region: RegionSelection::All,
            price: dataset
                .price_bounds
                .unwrap_or(PriceRange::new(0.0, 0.0)),
        }
    }

    /// A record passes when both the region and the price predicate hold.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.region.matches(&record.territory_group) && self.price.contains(record.total_price)
    }
}

/// Values for the region selector: [`ALL_REGIONS`] followed by the territory
/// groups in the order they first appear in the dataset.
pub fn region_options(dataset: &SalesDataset) -> Vec<String> {
    std::iter::once(ALL_REGIONS.to_string())
        .chain(dataset.territory_groups.iter().cloned())
        .collect()
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Read-only subset of a dataset, kept as row indices in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a SalesDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record.
    pub fn all(dataset: &'a SalesDataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Records in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }

    /// Narrow this view further. Lets callers re-apply criteria to an
    /// already filtered view.
    pub fn refine(&self, criteria: &FilterCriteria) -> FilteredView<'a> {
        FilteredView {
            dataset: self.dataset,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| criteria.matches(&self.dataset.records[i]))
                .collect(),
        }
    }
}

/// Return the view of records passing both filters.
///
/// * Region: [`RegionSelection::All`] passes everything; otherwise the
///   territory group must match exactly.
/// * Price: `min <= total_price <= max`. An inverted range matches nothing.
///
/// An empty result is a valid outcome, not an error.
pub fn apply_filters<'a>(dataset: &'a SalesDataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    FilteredView::all(dataset).refine(criteria)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::NA_SENTINEL;

    fn record(region: &str, price: f64) -> SalesRecord {
        SalesRecord {
            order_date: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
            territory_group: region.to_string(),
            total_price: price,
            quantity: 1,
            customer_id: "1".to_string(),
            category: "Bikes".to_string(),
            product_name: "A".to_string(),
            gender: None,
            color: NA_SENTINEL.to_string(),
            size_range: NA_SENTINEL.to_string(),
        }
    }

    fn dataset() -> SalesDataset {
        SalesDataset::from_records(vec![
            record("East", 100.0),
            record("West", 200.0),
            record("East", 50.0),
        ])
    }

    #[test]
    fn region_filter_is_exact_and_case_sensitive() {
        let ds = dataset();
        let mut criteria = FilterCriteria::unfiltered(&ds);
        criteria.region = RegionSelection::from_label("East");
        assert_eq!(apply_filters(&ds, &criteria).indices(), &[0, 2]);

        criteria.region = RegionSelection::from_label("east");
        assert!(apply_filters(&ds, &criteria).is_empty());
    }

    #[test]
    fn all_label_is_the_wildcard() {
        assert_eq!(RegionSelection::from_label(ALL_REGIONS), RegionSelection::All);
        let ds = dataset();
        let view = apply_filters(&ds, &FilterCriteria::unfiltered(&ds));
        assert_eq!(view.len(), ds.len());
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let ds = dataset();
        let criteria = FilterCriteria {
            region: RegionSelection::All,
            price: PriceRange::new(50.0, 100.0),
        };
        assert_eq!(apply_filters(&ds, &criteria).indices(), &[0, 2]);
    }

    #[test]
    fn inverted_price_range_matches_nothing() {
        let ds = dataset();
        let criteria = FilterCriteria {
            region: RegionSelection::All,
            price: PriceRange::new(150.0, 60.0),
        };
        assert!(apply_filters(&ds, &criteria).is_empty());
    }

    #[test]
    fn refining_twice_is_idempotent() {
        let ds = dataset();
        let criteria = FilterCriteria {
            region: RegionSelection::Group("East".into()),
            price: PriceRange::new(60.0, 500.0),
        };
        let once = apply_filters(&ds, &criteria);
        let twice = once.refine(&criteria);
        assert_eq!(once.indices(), twice.indices());
        assert_eq!(once.indices(), &[0]);
    }

    #[test]
    fn region_options_start_with_all() {
        let ds = dataset();
        assert_eq!(region_options(&ds), ["All", "East", "West"]);
    }
}
