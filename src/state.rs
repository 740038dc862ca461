use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::callback::{CallbackRegistry, InputId, OutputId};
use crate::color::ColorMap;
use crate::config::DashConfig;
use crate::data::model::{LaunchDataset, PayloadRange, SelectionState, SiteSelection};
use crate::figure::{Figure, PieFigure, ScatterFigure};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, never mutated.
    pub dataset: Arc<LaunchDataset>,

    pub config: Arc<DashConfig>,

    registry: Arc<CallbackRegistry>,

    /// Current dropdown and slider values.
    pub selection: SelectionState,

    /// Latest figure per output region.
    pub figures: BTreeMap<OutputId, Figure>,

    /// Colours for the current scatter groups (pie colours are fixed).
    pub scatter_colors: ColorMap,

    /// Where the HTTP bridge is listening, shown in the side panel.
    pub http_address: Option<SocketAddr>,
}

impl AppState {
    /// Initial selection (all sites, full payload range) and first render.
    pub fn new(
        dataset: Arc<LaunchDataset>,
        registry: Arc<CallbackRegistry>,
        config: Arc<DashConfig>,
    ) -> Self {
        let payload_range = dataset
            .payload_bounds()
            .unwrap_or_else(|| config.slider.full_range());
        let selection = SelectionState {
            site: SiteSelection::All,
            payload_range,
        };

        let mut state = Self {
            dataset,
            config,
            registry,
            selection,
            figures: BTreeMap::new(),
            scatter_colors: ColorMap::new([]),
            http_address: None,
        };
        let initial = state.registry.render_all(&state.dataset, &state.selection);
        state.apply(initial);
        state
    }

    /// Dropdown changed. No-op when the value is unchanged.
    pub fn set_site(&mut self, site: SiteSelection) {
        if self.selection.site == site {
            return;
        }
        self.selection.site = site;
        self.notify(InputId::SiteDropdown);
    }

    /// Slider changed. No-op when the value is unchanged.
    pub fn set_payload_range(&mut self, range: PayloadRange) {
        if self.selection.payload_range == range {
            return;
        }
        self.selection.payload_range = range;
        self.notify(InputId::PayloadSlider);
    }

    fn notify(&mut self, changed: InputId) {
        let updates = self
            .registry
            .dispatch(&self.dataset, &self.selection, changed);
        self.apply(updates);
    }

    fn apply(&mut self, updates: Vec<(OutputId, Figure)>) {
        for (output, figure) in updates {
            if let Figure::Scatter(scatter) = &figure {
                self.scatter_colors = ColorMap::new(scatter.groups());
            }
            self.figures.insert(output, figure);
        }
    }

    pub fn pie(&self) -> Option<&PieFigure> {
        match self.figures.get(&OutputId::SuccessPieChart) {
            Some(Figure::Pie(pie)) => Some(pie),
            _ => None,
        }
    }

    pub fn scatter(&self) -> Option<&ScatterFigure> {
        match self.figures.get(&OutputId::SuccessPayloadScatterChart) {
            Some(Figure::Scatter(scatter)) => Some(scatter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::dashboard_callbacks;
    use crate::data::model::{LaunchRecord, OutcomeClass};

    fn app_state() -> AppState {
        let dataset = LaunchDataset::from_records(vec![
            LaunchRecord::new("CCAFS LC-40", 500.0, OutcomeClass::Success),
            LaunchRecord::new("KSC LC-39A", 9600.0, OutcomeClass::Failure),
            LaunchRecord::new("CCAFS LC-40", 3000.0, OutcomeClass::Failure),
        ]);
        AppState::new(
            Arc::new(dataset),
            Arc::new(dashboard_callbacks().unwrap()),
            Arc::new(DashConfig::default()),
        )
    }

    #[test]
    fn starts_with_all_sites_and_dataset_bounds() {
        let state = app_state();
        assert_eq!(state.selection.site, SiteSelection::All);
        assert_eq!(state.selection.payload_range, PayloadRange::new(500.0, 9600.0));
        assert_eq!(state.pie().unwrap().total(), 3.0);
        assert_eq!(state.scatter().unwrap().points.len(), 3);
    }

    #[test]
    fn empty_dataset_falls_back_to_slider_limits() {
        let state = AppState::new(
            Arc::new(LaunchDataset::from_records(Vec::new())),
            Arc::new(dashboard_callbacks().unwrap()),
            Arc::new(DashConfig::default()),
        );
        assert_eq!(state.selection.payload_range, PayloadRange::new(0.0, 10000.0));
        assert!(state.pie().unwrap().sectors().is_empty());
    }

    #[test]
    fn site_change_updates_both_charts() {
        let mut state = app_state();
        state.set_site(SiteSelection::from("KSC LC-39A"));
        assert_eq!(
            state.pie().unwrap().title,
            "Success vs Failed Launches for KSC LC-39A"
        );
        assert_eq!(state.scatter().unwrap().points.len(), 1);
    }

    #[test]
    fn slider_change_leaves_pie_untouched() {
        let mut state = app_state();
        let pie_before = state.pie().cloned();
        state.set_payload_range(PayloadRange::new(0.0, 4000.0));
        assert_eq!(state.pie().cloned(), pie_before);
        let xs: Vec<f64> = state.scatter().unwrap().points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![500.0, 3000.0]);
    }
}
