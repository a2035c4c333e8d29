use crate::gui_bridge::model::VisualizationModel;
use crate::storage::DirectoryStorage;
use crate::workflow::runner::Runner;
use anyhow::{anyhow, Result};
use conecore::chart::{ChartLibrary, SavedChart};
use log::{error, info, warn};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

pub type SharedLibrary = Arc<RwLock<ChartLibrary<DirectoryStorage>>>;

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

/// Bridge that publishes the latest plotted chart over HTTP.
pub struct GuiBridge {
    state: Arc<RwLock<VisualizationModel>>,
    library: SharedLibrary,
    runner: Arc<Runner>,
}

/// Stores `chart`, plots it and publishes it as the current view.
fn ingest_chart(
    state: &RwLock<VisualizationModel>,
    library: &RwLock<ChartLibrary<DirectoryStorage>>,
    runner: &Runner,
    chart: SavedChart,
) -> Result<usize> {
    let plotted = runner.plot_chart(&chart)?;
    let (index, charts) = {
        let mut guard = library
            .write()
            .map_err(|_| anyhow!("chart library lock poisoned"))?;
        let index = guard.save(chart.clone())?;
        (index, guard.summaries()?)
    };
    let mut guard = state
        .write()
        .map_err(|_| anyhow!("visualization state lock poisoned"))?;
    *guard = VisualizationModel::new(chart, plotted, charts);
    Ok(index)
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>, library: SharedLibrary) -> Self {
        Self {
            state: Arc::new(RwLock::new(VisualizationModel::default())),
            library,
            runner,
        }
    }

    /// Starts the HTTP endpoints on a background thread.
    pub fn serve(&self, address: SocketAddr) {
        let state_for_filter = self.state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let library_for_filter = self.library.clone();
        let library_filter = warp::any().map(move || library_for_filter.clone());
        let runner = self.runner.clone();
        let runner_filter = warp::any().map(move || runner.clone());

        let payload_route = warp::path("payload")
            .and(warp::get())
            .and(state_filter.clone())
            .and_then(|state: Arc<RwLock<VisualizationModel>>| async move {
                match state.read() {
                    Ok(guard) => Ok(warp::reply::json(&*guard)),
                    Err(_) => Err(warp::reject::custom(WarpError)),
                }
            });

        let charts_route = warp::path("charts")
            .and(warp::get())
            .and(library_filter.clone())
            .and_then(|library: SharedLibrary| async move {
                let summaries = library
                    .read()
                    .map_err(|_| anyhow!("chart library lock poisoned"))
                    .and_then(|guard| guard.summaries().map_err(anyhow::Error::from));
                match summaries {
                    Ok(summaries) => Ok(warp::reply::json(&summaries)),
                    Err(err) => {
                        error!("charts error: {}", err);
                        Err(warp::reject::custom(WarpError))
                    }
                }
            });

        let ingest_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(library_filter)
            .and(runner_filter)
            .and_then(
                |chart: SavedChart,
                 state: Arc<RwLock<VisualizationModel>>,
                 library: SharedLibrary,
                 runner: Arc<Runner>| async move {
                    let name = chart.name.clone();
                    match ingest_chart(&state, &library, &runner, chart) {
                        Ok(index) => {
                            info!("[GUI] chart {} ingested at {}", name, index);
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({"status": "ok", "index": index})),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            warn!("ingest error: {:#}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = payload_route.or(charts_route).or(ingest_route);
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(routes).run(address).await;
            });
        });
    }

    pub fn publish(&self, model: &VisualizationModel) -> Result<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| anyhow!("visualization state lock poisoned"))?;
        *guard = model.clone();
        info!(
            "[GUI] plotted cones: {}, stored charts: {}",
            guard.plotted.len(),
            guard.charts.len()
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
        if let Ok(mut guard) = self.state.write() {
            guard.status = message.to_string();
        }
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        self.state
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}
