use std::path::Path;
use std::sync::Arc;

use bee_cycle_dashboard::config::DashboardConfig;
use bee_cycle_dashboard::dashboard::{build_dashboard, DashboardSpec};
use bee_cycle_dashboard::data::aggregate::build_report;
use bee_cycle_dashboard::data::filter::{apply_filters, FilterCriteria, RegionSelection};
use bee_cycle_dashboard::data::loader::load_cached;
use bee_cycle_dashboard::data::model::SalesDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<SalesDataset>>,

    /// Current sidebar selection.
    pub criteria: Option<FilterCriteria>,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Charts and metrics for the current filters (cached).
    pub dashboard: Option<DashboardSpec>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            criteria: None,
            visible_indices: Vec::new(),
            dashboard: None,
            status_message: None,
        }
    }

    /// Load (or fetch from cache) a dataset. On failure everything derived
    /// from the previous dataset is dropped so no partial dashboard remains.
    pub fn open(&mut self, path: &Path) {
        match load_cached(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.dataset = None;
                self.criteria = None;
                self.visible_indices.clear();
                self.dashboard = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset filters to show everything.
    pub fn set_dataset(&mut self, dataset: Arc<SalesDataset>) {
        self.criteria = Some(FilterCriteria::unfiltered(&dataset));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the view, the report and the dashboard after a filter change.
    pub fn refilter(&mut self) {
        let (Some(ds), Some(criteria)) = (&self.dataset, &self.criteria) else {
            return;
        };
        let view = apply_filters(ds, criteria);
        let report = build_report(&view, self.config.top_products);
        log::debug!(
            "Filters {:?} / [{}, {}] keep {} of {} rows",
            criteria.region,
            criteria.price.min,
            criteria.price.max,
            view.len(),
            ds.len()
        );
        self.visible_indices = view.indices().to_vec();
        self.dashboard = Some(build_dashboard(&report, &self.config));
    }

    /// Select a region by its selector label.
    pub fn set_region(&mut self, label: &str) {
        if let Some(criteria) = &mut self.criteria {
            criteria.region = RegionSelection::from_label(label);
        }
        self.refilter();
    }

    /// Back to all regions and the full price range.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria = Some(FilterCriteria::unfiltered(ds));
        }
        self.refilter();
    }
}
