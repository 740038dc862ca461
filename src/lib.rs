//! SpaceX launch records dashboard.
//!
//! The launch table is loaded once into an immutable [`LaunchDataset`]. Two
//! pure derivations (outcome counts per class, payload/outcome rows) feed the
//! pie and scatter charts through a [`CallbackRegistry`] shared by the native
//! egui window and the JSON HTTP bridge.

pub mod app;
pub mod callback;
pub mod color;
pub mod config;
pub mod data;
pub mod figure;
pub mod server;
pub mod state;
pub mod ui;

pub use callback::{dashboard_callbacks, CallbackRegistry, InputId, OutputId};
pub use data::filter::{
    compute_outcome_distribution, select_payload_outcome_rows, OutcomeDistribution,
    PayloadOutcomeRows,
};
pub use data::model::{
    LaunchDataset, LaunchRecord, OutcomeClass, PayloadRange, SelectionState, SiteSelection,
};
