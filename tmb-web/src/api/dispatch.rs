//! Hash-route dispatch
//!
//! Lets a client hand over `location.hash` as-is and get back the view it
//! names together with that view's payload.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::route::ViewRoute;
use crate::AppState;

use super::{about, bib, doc, model, topic, word};

#[derive(Debug, Default, Deserialize)]
pub struct RouteQuery {
    pub hash: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub view: &'static str,
    pub data: Value,
}

fn to_value<T: Serialize>(payload: T) -> ApiResult<Value> {
    serde_json::to_value(payload).map_err(|e| ApiError::Internal(e.to_string()))
}

/// GET /api/route?hash=
pub async fn dispatch_route(
    State(state): State<AppState>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> ApiResult<Json<RouteResponse>> {
    let Query(query) = query?;
    let hash = query.hash.unwrap_or_default();
    let parsed = ViewRoute::parse(&hash);
    if parsed == ViewRoute::Unknown {
        debug!("Unknown route {:?}, showing model view", hash);
    }
    let route = parsed.or_model();

    let corpus = state.corpus.read().await;
    let vis = state.vis.as_ref();
    let data = match &route {
        ViewRoute::Model | ViewRoute::Unknown => to_value(model::model_view(&corpus, vis)?)?,
        ViewRoute::About => to_value(about::about_view(&corpus)?)?,
        ViewRoute::Bib => to_value(bib::bib_view(&state, &corpus, vis.bib_sort())?)?,
        ViewRoute::Topic(t) => to_value(topic::topic_view(&corpus, vis, *t)?)?,
        ViewRoute::Word(w) => to_value(word::word_view(&corpus, vis, w)?)?,
        ViewRoute::Doc(d) => to_value(doc::doc_view(&corpus, vis, *d)?)?,
    };

    Ok(Json(RouteResponse {
        view: route.name(),
        data,
    }))
}
