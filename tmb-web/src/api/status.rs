//! Load status and effective view configuration

use axum::{extract::State, Json};
use serde::Serialize;
use tmb_common::{Artifact, VisConfig};

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub title: Option<String>,
    pub loaded: Vec<Artifact>,
    pub missing: Vec<Artifact>,
}

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let corpus = state.corpus.read().await;
    let (loaded, missing): (Vec<Artifact>, Vec<Artifact>) = Artifact::ALL
        .iter()
        .copied()
        .partition(|&artifact| corpus.is_loaded(artifact));

    Json(StatusResponse {
        title: corpus.info().ok().map(|info| info.title.clone()),
        loaded,
        missing,
    })
}

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<VisConfig> {
    Json(state.vis.as_ref().clone())
}
