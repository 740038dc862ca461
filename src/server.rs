use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Runtime};
use warp::{Filter, Rejection, Reply};

use crate::callback::{CallbackRegistry, InputId, OutputId};
use crate::config::{DashConfig, SiteOption, SliderConfig};
use crate::data::filter::{compute_outcome_distribution, select_payload_outcome_rows};
use crate::data::model::{LaunchDataset, PayloadRange, SelectionState, SiteSelection};
use crate::figure::Figure;

// ---------------------------------------------------------------------------
// Shared, read-only state behind every route
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct BridgeState {
    pub dataset: Arc<LaunchDataset>,
    pub registry: Arc<CallbackRegistry>,
    pub config: Arc<DashConfig>,
}

impl BridgeState {
    /// Dataset bounds, or the slider's full extent for an empty dataset.
    fn default_range(&self) -> PayloadRange {
        self.dataset
            .payload_bounds()
            .unwrap_or_else(|| self.config.slider.full_range())
    }

    fn selection(
        &self,
        site: SiteSelection,
        low: Option<f64>,
        high: Option<f64>,
    ) -> SelectionState {
        let default = self.default_range();
        SelectionState {
            site,
            payload_range: PayloadRange::new(
                low.unwrap_or(default.low),
                high.unwrap_or(default.high),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SiteQuery {
    #[serde(default)]
    site: SiteSelection,
}

#[derive(Debug, Deserialize)]
struct PayloadQuery {
    #[serde(default)]
    site: SiteSelection,
    low: Option<f64>,
    high: Option<f64>,
}

/// One input change, carrying the full selection after the change.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub changed: InputId,
    pub site: SiteSelection,
    pub payload_range: PayloadRange,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub outputs: BTreeMap<OutputId, Figure>,
}

#[derive(Serialize)]
struct DatasetSummary<'a> {
    records: usize,
    min_payload: Option<f64>,
    max_payload: Option<f64>,
    sites: &'a [String],
    site_options: &'a [SiteOption],
    slider: SliderConfig,
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// All JSON endpoints of the bridge.
pub fn routes(
    state: BridgeState,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let dataset_route = warp::path!("api" / "dataset")
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: BridgeState| {
            let ds = &state.dataset;
            warp::reply::json(&DatasetSummary {
                records: ds.len(),
                min_payload: ds.min_payload(),
                max_payload: ds.max_payload(),
                sites: ds.sites(),
                site_options: &state.config.site_options,
                slider: state.config.slider,
            })
        });

    let outcomes_route = warp::path!("api" / "outcomes")
        .and(warp::get())
        .and(warp::query::<SiteQuery>())
        .and(state_filter.clone())
        .map(|query: SiteQuery, state: BridgeState| {
            warp::reply::json(&compute_outcome_distribution(&state.dataset, &query.site))
        });

    let payload_route = warp::path!("api" / "payload")
        .and(warp::get())
        .and(warp::query::<PayloadQuery>())
        .and(state_filter.clone())
        .map(|query: PayloadQuery, state: BridgeState| {
            let selection = state.selection(query.site, query.low, query.high);
            warp::reply::json(&select_payload_outcome_rows(
                &state.dataset,
                &selection.site,
                selection.payload_range,
            ))
        });

    let figures_route = warp::path!("api" / "figures")
        .and(warp::get())
        .and(warp::query::<PayloadQuery>())
        .and(state_filter.clone())
        .map(|query: PayloadQuery, state: BridgeState| {
            let selection = state.selection(query.site, query.low, query.high);
            let outputs = state.registry.render_all(&state.dataset, &selection);
            warp::reply::json(&UpdateResponse {
                outputs: outputs.into_iter().collect(),
            })
        });

    let update_route = warp::path!("api" / "update")
        .and(warp::post())
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(state_filter)
        .map(|request: UpdateRequest, state: BridgeState| {
            let selection = SelectionState {
                site: request.site,
                payload_range: request.payload_range,
            };
            let outputs = state
                .registry
                .dispatch(&state.dataset, &selection, request.changed);
            warp::reply::json(&UpdateResponse {
                outputs: outputs.into_iter().collect(),
            })
        });

    dataset_route
        .or(outcomes_route)
        .or(payload_route)
        .or(figures_route)
        .or(update_route)
        .with(warp::log("spacex_dash::server"))
}

// ---------------------------------------------------------------------------
// Background server
// ---------------------------------------------------------------------------

/// HTTP bridge running on its own tokio runtime alongside the UI thread.
pub struct HttpBridge {
    addr: SocketAddr,
    // Dropping the runtime shuts the server down.
    _runtime: Runtime,
}

impl HttpBridge {
    /// Bind `addr` and start serving. Bind failures are returned, not retried.
    pub fn start(state: BridgeState, addr: SocketAddr) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("http-bridge")
            .enable_all()
            .build()
            .context("creating runtime for HTTP bridge")?;

        let (bound, server) = runtime
            .block_on(async { warp::serve(routes(state)).try_bind_ephemeral(addr) })
            .with_context(|| format!("binding HTTP bridge to {addr}"))?;
        runtime.spawn(server);

        log::info!("HTTP bridge listening on http://{bound}");
        Ok(Self {
            addr: bound,
            _runtime: runtime,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::dashboard_callbacks;
    use crate::data::model::{LaunchRecord, OutcomeClass};
    use serde_json::{json, Value};

    fn state() -> BridgeState {
        BridgeState {
            dataset: Arc::new(LaunchDataset::from_records(vec![
                LaunchRecord::new("CCAFS LC-40", 500.0, OutcomeClass::Success),
                LaunchRecord::new("KSC LC-39A", 9600.0, OutcomeClass::Failure),
                LaunchRecord::new("CCAFS LC-40", 3000.0, OutcomeClass::Failure),
            ])),
            registry: Arc::new(dashboard_callbacks().unwrap()),
            config: Arc::new(DashConfig::default()),
        }
    }

    fn body_json(resp: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
        serde_json::from_slice(resp.body()).unwrap()
    }

    #[tokio::test]
    async fn dataset_summary_reports_bounds() {
        let resp = warp::test::request()
            .path("/api/dataset")
            .reply(&routes(state()))
            .await;
        assert_eq!(resp.status(), 200);
        let body = body_json(&resp);
        assert_eq!(body["records"], 3);
        assert_eq!(body["min_payload"], 500.0);
        assert_eq!(body["max_payload"], 9600.0);
        assert_eq!(body["slider"]["step"], 100.0);
    }

    #[tokio::test]
    async fn outcomes_default_to_all_sites() {
        let resp = warp::test::request()
            .path("/api/outcomes")
            .reply(&routes(state()))
            .await;
        let body = body_json(&resp);
        assert_eq!(body["counts"], json!({"0": 2, "1": 1}));
        assert_eq!(body["title"], "Total Successful Launches for All Sites");
    }

    #[tokio::test]
    async fn outcomes_for_one_site() {
        let resp = warp::test::request()
            .path("/api/outcomes?site=CCAFS%20LC-40")
            .reply(&routes(state()))
            .await;
        let body = body_json(&resp);
        assert_eq!(body["counts"], json!({"0": 1, "1": 1}));
    }

    #[tokio::test]
    async fn payload_rows_respect_range() {
        let resp = warp::test::request()
            .path("/api/payload?site=ALL&low=0&high=4000")
            .reply(&routes(state()))
            .await;
        let body = body_json(&resp);
        assert_eq!(body["rows"], json!([[500.0, 1], [3000.0, 0]]));
    }

    #[tokio::test]
    async fn payload_range_defaults_to_dataset_bounds() {
        let resp = warp::test::request()
            .path("/api/payload")
            .reply(&routes(state()))
            .await;
        assert_eq!(body_json(&resp)["rows"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn malformed_query_is_rejected() {
        let resp = warp::test::request()
            .path("/api/payload?low=heavy")
            .reply(&routes(state()))
            .await;
        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    async fn update_dispatches_through_registry() {
        let resp = warp::test::request()
            .method("POST")
            .path("/api/update")
            .json(&json!({
                "changed": "payload-slider",
                "site": "ALL",
                "payload_range": [0.0, 4000.0]
            }))
            .reply(&routes(state()))
            .await;
        assert_eq!(resp.status(), 200);
        let update: UpdateResponse = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(update.outputs.len(), 1);
        match &update.outputs[&OutputId::SuccessPayloadScatterChart] {
            Figure::Scatter(scatter) => assert_eq!(scatter.points.len(), 2),
            other => panic!("expected scatter, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn figures_render_every_output() {
        let resp = warp::test::request()
            .path("/api/figures?site=KSC%20LC-39A")
            .reply(&routes(state()))
            .await;
        let body = body_json(&resp);
        assert_eq!(body["outputs"]["success-pie-chart"]["kind"], "pie");
        assert_eq!(
            body["outputs"]["success-payload-scatter-chart"]["title"],
            "Payload vs Launch Success for KSC LC-39A"
        );
    }

    #[test]
    fn bridge_binds_an_ephemeral_port() {
        let bridge = HttpBridge::start(state(), "127.0.0.1:0".parse().unwrap()).unwrap();
        assert_ne!(bridge.local_addr().port(), 0);
    }
}
