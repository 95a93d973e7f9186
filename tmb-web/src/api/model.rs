//! Model overview: every topic with its top words and alpha

use axum::{extract::State, Json};
use serde::Serialize;
use tmb_common::cite::{topic_label, topic_link};
use tmb_common::{Artifact, Corpus, VisConfig};

use crate::error::ApiResult;
use crate::{require, AppState};

#[derive(Debug, Serialize)]
pub struct ModelTopic {
    /// Zero-based topic index
    pub topic: usize,
    pub label: String,
    pub link: String,
    pub words: Vec<String>,
    pub alpha: f64,
}

#[derive(Debug, Serialize)]
pub struct ModelView {
    pub title: String,
    pub topics: Vec<ModelTopic>,
}

pub fn model_view(corpus: &Corpus, vis: &VisConfig) -> ApiResult<ModelView> {
    require(corpus, &[Artifact::TopicWords])?;

    let title = corpus
        .info()
        .map(|info| info.title.clone())
        .unwrap_or_default();

    let topics = (0..corpus.n_topics()?)
        .map(|topic| -> ApiResult<ModelTopic> {
            let words = corpus.topic_words(topic, vis.overview_words)?.to_vec();
            Ok(ModelTopic {
                topic,
                label: topic_label(topic, words.as_slice()),
                link: topic_link(topic),
                alpha: corpus.alpha(topic)?,
                words,
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(ModelView { title, topics })
}

/// GET /api/model
pub async fn get_model_view(State(state): State<AppState>) -> ApiResult<Json<ModelView>> {
    let corpus = state.corpus.read().await;
    Ok(Json(model_view(&corpus, &state.vis)?))
}
