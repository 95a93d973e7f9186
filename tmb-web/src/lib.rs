//! tmb-web library - topic model browser service
//!
//! Serves a pre-computed topic model read-only: model overview, topic,
//! word, document and bibliography views as JSON, plus a static UI shell.

use axum::Router;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tmb_common::bib::{partition, BibSort, Ordering};
use tmb_common::events::EventBus;
use tmb_common::{Artifact, Corpus, VisConfig};

use crate::error::{ApiError, ApiResult};

pub mod api;
pub mod error;
pub mod loader;
pub mod route;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Corpus, filled in artifact by artifact as loads complete
    pub corpus: Arc<RwLock<Corpus>>,
    /// Effective view configuration (defaults + info.json overrides)
    pub vis: Arc<VisConfig>,
    /// Artifact load notifications
    pub events: EventBus,
    /// Directory the artifacts are read from
    pub data_dir: PathBuf,
    /// Memoized bibliography orderings for the installed metadata
    bib_cache: Arc<Mutex<HashMap<BibSort, Arc<Ordering>>>>,
}

impl AppState {
    /// Create new application state with an empty corpus
    pub fn new(data_dir: PathBuf, vis: VisConfig, events: EventBus) -> Self {
        Self {
            corpus: Arc::new(RwLock::new(Corpus::new())),
            vis: Arc::new(vis),
            events,
            data_dir,
            bib_cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Bibliography ordering for `sort`, computed once per metadata snapshot
    pub fn bib_ordering(&self, corpus: &Corpus, sort: BibSort) -> ApiResult<Arc<Ordering>> {
        let documents = corpus.documents()?;
        let mut cache = self
            .bib_cache
            .lock()
            .map_err(|_| ApiError::Internal("bibliography cache poisoned".to_string()))?;
        let ordering = cache
            .entry(sort)
            .or_insert_with(|| Arc::new(partition(documents, sort)));
        Ok(Arc::clone(ordering))
    }

    /// Drop memoized orderings (after the metadata changes)
    pub fn clear_bib_cache(&self) {
        if let Ok(mut cache) = self.bib_cache.lock() {
            cache.clear();
        }
    }
}

/// Fail with a loading error unless all `needed` artifacts are installed
pub fn require(corpus: &Corpus, needed: &[Artifact]) -> ApiResult<()> {
    let missing = corpus.missing(needed);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Loading(missing))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;
    use tower_http::services::ServeDir;
    use tower_http::trace::TraceLayer;

    let views = Router::new()
        .route("/api/model", get(api::get_model_view))
        .route("/api/topic/:number", get(api::get_topic_view))
        .route("/api/topic/:number/yearly", get(api::get_topic_yearly))
        .route("/api/word/:word", get(api::get_word_view))
        .route("/api/doc/:doc", get(api::get_doc_view))
        .route("/api/bib", get(api::get_bib_view))
        .route("/api/about", get(api::get_about_view))
        .route("/api/route", get(api::dispatch_route));

    let service = Router::new()
        .route("/api/status", get(api::get_status))
        .route("/api/config", get(api::get_config))
        .route("/api/events", get(api::event_stream))
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes());

    let plots = ServeDir::new(state.data_dir.join("topic_plot"));

    Router::new()
        .merge(views)
        .merge(service)
        .nest_service("/topic_plot", plots)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
