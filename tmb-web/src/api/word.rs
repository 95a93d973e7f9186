//! Word view: the topics listing a word among their top words

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde::Serialize;
use tmb_common::cite::{topic_label, topic_link};
use tmb_common::{Artifact, Corpus, VisConfig};

use crate::error::ApiResult;
use crate::{require, AppState};

#[derive(Debug, Serialize)]
pub struct WordTopicEntry {
    /// One-based rank of the word within the topic
    pub rank: usize,
    pub topic: usize,
    pub label: String,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct WordView {
    pub word: String,
    pub topics: Vec<WordTopicEntry>,
}

pub fn word_view(corpus: &Corpus, vis: &VisConfig, word: &str) -> ApiResult<WordView> {
    require(corpus, &[Artifact::TopicWords])?;

    let topics = corpus
        .word_topics(word)?
        .into_iter()
        .map(|wt| -> ApiResult<WordTopicEntry> {
            let words = corpus.topic_words(wt.topic, vis.overview_words)?;
            Ok(WordTopicEntry {
                rank: wt.rank + 1,
                topic: wt.topic,
                label: topic_label(wt.topic, words),
                link: topic_link(wt.topic),
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(WordView {
        word: word.to_string(),
        topics,
    })
}

/// GET /api/word/:word
pub async fn get_word_view(
    State(state): State<AppState>,
    word: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<WordView>> {
    let Path(word) = word?;
    let corpus = state.corpus.read().await;
    Ok(Json(word_view(&corpus, &state.vis, &word)?))
}
