//! Artifact loading
//!
//! `info.json` is read before the server starts, since it carries the view
//! configuration overrides. The other four artifacts load as independent
//! tasks in whatever order they finish; each one is installed into the
//! corpus once and announced on the event bus. A failed artifact stays
//! absent and every view that needs it keeps answering "loading".

use std::path::Path;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use tmb_common::document::parse_meta_csv;
use tmb_common::events::{EventBus, TmbEvent};
use tmb_common::model::{parse_doc_len, DocTopicMatrix, ModelInfo, TopicWords};
use tmb_common::{Artifact, Error, Result, VisConfig};

use crate::AppState;

/// Artifacts loaded in the background after startup
pub const BACKGROUND_ARTIFACTS: [Artifact; 4] = [
    Artifact::Meta,
    Artifact::DocTopics,
    Artifact::TopicWords,
    Artifact::DocLengths,
];

/// Read and decode `info.json`
pub async fn read_info(data_dir: &Path) -> Result<ModelInfo> {
    let path = data_dir.join(Artifact::Info.file_name());
    let text = tokio::fs::read_to_string(&path).await?;
    ModelInfo::from_json(&text)
}

/// Read `info.json`, derive the view configuration and create app state
///
/// The returned state has info installed and nothing else.
pub async fn bootstrap(data_dir: &Path, events: EventBus) -> Result<AppState> {
    let info = read_info(data_dir).await?;
    info!("Model: {}", info.title);

    let vis = match &info.vis {
        Some(overrides) => VisConfig::default().with_overrides(overrides),
        None => VisConfig::default(),
    };

    let state = AppState::new(data_dir.to_path_buf(), vis, events);
    state.corpus.write().await.set_info(info);
    Ok(state)
}

/// Read, parse and install one artifact
///
/// Returns whether the artifact was installed (false if it already was).
/// `info.json` is not loadable here; [`bootstrap`] installs it.
pub async fn load_artifact(state: &AppState, artifact: Artifact) -> Result<bool> {
    if artifact == Artifact::Info {
        return Err(Error::InvalidInput(
            "info.json is only read at bootstrap".to_string(),
        ));
    }

    let path = state.data_dir.join(artifact.file_name());
    let text = tokio::fs::read_to_string(&path).await?;

    let installed = match artifact {
        Artifact::Info => false, // rejected above
        Artifact::Meta => {
            let parsed = parse_meta_csv(&text)?;
            let count = parsed.len();
            let installed = state.corpus.write().await.set_meta(parsed);
            if installed {
                state.clear_bib_cache();
                info!("Loaded metadata for {} documents", count);
            }
            installed
        }
        Artifact::DocTopics => {
            let parsed = DocTopicMatrix::from_json(&text)?;
            state.corpus.write().await.set_dt(parsed)
        }
        Artifact::TopicWords => {
            let parsed = TopicWords::from_json(&text)?;
            let count = parsed.n_topics();
            let installed = state.corpus.write().await.set_tw(parsed);
            if installed {
                info!("Loaded word lists for {} topics", count);
            }
            installed
        }
        Artifact::DocLengths => {
            let parsed = parse_doc_len(&text)?;
            state.corpus.write().await.set_doc_len(parsed)
        }
    };

    Ok(installed)
}

/// Load one artifact and report the outcome on the event bus
async fn load_and_announce(state: AppState, artifact: Artifact) {
    match load_artifact(&state, artifact).await {
        Ok(true) => {
            info!("✓ Loaded {}", artifact);
            state.events.emit_lossy(TmbEvent::ArtifactLoaded {
                artifact,
                timestamp: chrono::Utc::now(),
            });
        }
        Ok(false) => warn!("{} was already loaded", artifact),
        Err(e) => {
            error!("Failed to load {}: {}", artifact, e);
            state.events.emit_lossy(TmbEvent::ArtifactFailed {
                artifact,
                message: e.to_string(),
                timestamp: chrono::Utc::now(),
            });
        }
    }
}

/// Start one independent load task per background artifact
pub fn spawn_artifact_loads(state: &AppState) -> Vec<JoinHandle<()>> {
    BACKGROUND_ARTIFACTS
        .iter()
        .map(|&artifact| tokio::spawn(load_and_announce(state.clone(), artifact)))
        .collect()
}

/// Load every background artifact and wait for all of them
pub async fn load_all(state: &AppState) {
    for handle in spawn_artifact_loads(state) {
        if let Err(e) = handle.await {
            error!("Artifact load task failed: {}", e);
        }
    }
}
