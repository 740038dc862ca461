//! Reactive wiring between named inputs and named outputs.
//!
//! Each output region is produced by exactly one callback, which declares the
//! inputs it listens to. When an input changes, every callback subscribed to
//! it is re-run against the shared dataset and the current selection.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::filter::{
    compute_outcome_distribution, payload_title, select_payload_outcome_records,
};
use crate::data::model::{LaunchDataset, SelectionState};
use crate::figure::{Figure, PieFigure, ScatterFigure};

/// Inputs the dashboard exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputId {
    SiteDropdown,
    PayloadSlider,
}

/// Output regions the callbacks render into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputId {
    SuccessPieChart,
    SuccessPayloadScatterChart,
}

impl InputId {
    pub fn as_str(self) -> &'static str {
        match self {
            InputId::SiteDropdown => "site-dropdown",
            InputId::PayloadSlider => "payload-slider",
        }
    }
}

impl OutputId {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputId::SuccessPieChart => "success-pie-chart",
            OutputId::SuccessPayloadScatterChart => "success-payload-scatter-chart",
        }
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CallbackError {
    #[error("output '{0}' already has a callback")]
    DuplicateOutput(OutputId),
    #[error("callback for '{0}' declares no inputs")]
    NoInputs(OutputId),
}

pub type Handler = dyn Fn(&LaunchDataset, &SelectionState) -> Figure + Send + Sync;

struct Callback {
    output: OutputId,
    inputs: Vec<InputId>,
    handler: Box<Handler>,
}

/// Subscription table: input → callbacks → output.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: Vec<Callback>,
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.callbacks.iter().map(|c| (c.output, &c.inputs)))
            .finish()
    }
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(
        &mut self,
        output: OutputId,
        inputs: &[InputId],
        handler: F,
    ) -> Result<(), CallbackError>
    where
        F: Fn(&LaunchDataset, &SelectionState) -> Figure + Send + Sync + 'static,
    {
        if inputs.is_empty() {
            return Err(CallbackError::NoInputs(output));
        }
        if self.callbacks.iter().any(|c| c.output == output) {
            return Err(CallbackError::DuplicateOutput(output));
        }
        self.callbacks.push(Callback {
            output,
            inputs: inputs.to_vec(),
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Outputs that re-render when `input` changes, in registration order.
    pub fn subscribers(&self, input: InputId) -> Vec<OutputId> {
        self.callbacks
            .iter()
            .filter(|c| c.inputs.contains(&input))
            .map(|c| c.output)
            .collect()
    }

    /// Re-run every callback listening to `changed`.
    pub fn dispatch(
        &self,
        dataset: &LaunchDataset,
        selection: &SelectionState,
        changed: InputId,
    ) -> Vec<(OutputId, Figure)> {
        let updates: Vec<_> = self
            .callbacks
            .iter()
            .filter(|c| c.inputs.contains(&changed))
            .map(|c| (c.output, (c.handler)(dataset, selection)))
            .collect();
        log::debug!(
            "{changed} changed (site={}, payload={:?}): {} output(s) updated",
            selection.site,
            selection.payload_range,
            updates.len()
        );
        updates
    }

    /// Run every callback once, as on first page render.
    pub fn render_all(
        &self,
        dataset: &LaunchDataset,
        selection: &SelectionState,
    ) -> Vec<(OutputId, Figure)> {
        self.callbacks
            .iter()
            .map(|c| (c.output, (c.handler)(dataset, selection)))
            .collect()
    }
}

/// The dashboard's two callbacks: outcome pie on the site dropdown, payload
/// scatter on both the dropdown and the payload slider.
pub fn dashboard_callbacks() -> Result<CallbackRegistry, CallbackError> {
    let mut registry = CallbackRegistry::new();

    registry.register(OutputId::SuccessPieChart, &[InputId::SiteDropdown], |ds, sel| {
        let dist = compute_outcome_distribution(ds, &sel.site);
        Figure::Pie(PieFigure::from_distribution(&dist))
    })?;

    registry.register(
        OutputId::SuccessPayloadScatterChart,
        &[InputId::SiteDropdown, InputId::PayloadSlider],
        |ds, sel| {
            let records = select_payload_outcome_records(ds, &sel.site, sel.payload_range);
            Figure::Scatter(ScatterFigure::from_records(payload_title(&sel.site), records))
        },
    )?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LaunchRecord, OutcomeClass, PayloadRange, SiteSelection};

    fn dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            LaunchRecord::new("CCAFS LC-40", 500.0, OutcomeClass::Success),
            LaunchRecord::new("KSC LC-39A", 9600.0, OutcomeClass::Failure),
            LaunchRecord::new("CCAFS LC-40", 3000.0, OutcomeClass::Failure),
        ])
    }

    fn selection(site: &str, low: f64, high: f64) -> SelectionState {
        SelectionState {
            site: SiteSelection::from(site),
            payload_range: PayloadRange::new(low, high),
        }
    }

    #[test]
    fn slider_only_updates_scatter() {
        let registry = dashboard_callbacks().unwrap();
        assert_eq!(
            registry.subscribers(InputId::PayloadSlider),
            vec![OutputId::SuccessPayloadScatterChart]
        );
        assert_eq!(
            registry.subscribers(InputId::SiteDropdown),
            vec![OutputId::SuccessPieChart, OutputId::SuccessPayloadScatterChart]
        );
    }

    #[test]
    fn dispatch_runs_subscribed_handlers() {
        let registry = dashboard_callbacks().unwrap();
        let updates = registry.dispatch(
            &dataset(),
            &selection("ALL", 0.0, 4000.0),
            InputId::PayloadSlider,
        );
        assert_eq!(updates.len(), 1);
        let (output, figure) = &updates[0];
        assert_eq!(*output, OutputId::SuccessPayloadScatterChart);
        match figure {
            Figure::Scatter(scatter) => {
                let xs: Vec<f64> = scatter.points.iter().map(|p| p.x).collect();
                assert_eq!(xs, vec![500.0, 3000.0]);
            }
            other => panic!("expected scatter, got {other:?}"),
        }
    }

    #[test]
    fn site_change_rerenders_both_charts() {
        let registry = dashboard_callbacks().unwrap();
        let updates = registry.dispatch(
            &dataset(),
            &selection("KSC LC-39A", 0.0, 10000.0),
            InputId::SiteDropdown,
        );
        let titles: Vec<&str> = updates.iter().map(|(_, f)| f.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Success vs Failed Launches for KSC LC-39A",
                "Payload vs Launch Success for KSC LC-39A",
            ]
        );
    }

    #[test]
    fn render_all_covers_every_output() {
        let registry = dashboard_callbacks().unwrap();
        let outputs: Vec<OutputId> = registry
            .render_all(&dataset(), &selection("ALL", 0.0, 10000.0))
            .into_iter()
            .map(|(o, _)| o)
            .collect();
        assert_eq!(
            outputs,
            vec![OutputId::SuccessPieChart, OutputId::SuccessPayloadScatterChart]
        );
    }

    #[test]
    fn wiring_errors_are_reported() {
        let mut registry = CallbackRegistry::new();
        let pie = |ds: &LaunchDataset, sel: &SelectionState| {
            Figure::Pie(PieFigure::from_distribution(&compute_outcome_distribution(ds, &sel.site)))
        };
        assert_eq!(
            registry.register(OutputId::SuccessPieChart, &[], pie),
            Err(CallbackError::NoInputs(OutputId::SuccessPieChart))
        );
        registry
            .register(OutputId::SuccessPieChart, &[InputId::SiteDropdown], pie)
            .unwrap();
        assert_eq!(
            registry.register(OutputId::SuccessPieChart, &[InputId::PayloadSlider], pie),
            Err(CallbackError::DuplicateOutput(OutputId::SuccessPieChart))
        );
    }

    #[test]
    fn ids_serialize_as_component_names() {
        assert_eq!(
            serde_json::to_string(&OutputId::SuccessPayloadScatterChart).unwrap(),
            "\"success-payload-scatter-chart\""
        );
        let id: InputId = serde_json::from_str("\"payload-slider\"").unwrap();
        assert_eq!(id, InputId::PayloadSlider);
    }
}
