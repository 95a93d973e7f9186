//! Document view: citation, link out and topic mix

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde::Serialize;
use tmb_common::cite::{cite, doc_uri, topic_label, topic_link, CiteStyle};
use tmb_common::{Artifact, Corpus, VisConfig};

use crate::error::ApiResult;
use crate::{require, AppState};

const DOC_ARTIFACTS: [Artifact; 4] = [
    Artifact::Meta,
    Artifact::DocTopics,
    Artifact::TopicWords,
    Artifact::DocLengths,
];

#[derive(Debug, Serialize)]
pub struct DocTopicEntry {
    pub topic: usize,
    pub label: String,
    pub link: String,
    pub weight: f64,
    /// Weight as a fraction of the document's token count
    pub frac: f64,
}

#[derive(Debug, Serialize)]
pub struct DocView {
    pub doc: usize,
    pub citation: String,
    pub uri: String,
    pub doi: String,
    pub doc_len: u64,
    pub topics: Vec<DocTopicEntry>,
}

pub fn doc_view(corpus: &Corpus, vis: &VisConfig, doc: usize) -> ApiResult<DocView> {
    require(corpus, &DOC_ARTIFACTS)?;

    let record = corpus.document(doc)?;
    let doc_len = corpus.doc_len(doc)?;

    let topics = corpus
        .doc_topics(doc, vis.doc_view_topics)?
        .into_iter()
        .map(|dt| -> ApiResult<DocTopicEntry> {
            let words = corpus.topic_words(dt.topic, vis.overview_words)?;
            Ok(DocTopicEntry {
                topic: dt.topic,
                label: topic_label(dt.topic, words),
                link: topic_link(dt.topic),
                weight: dt.weight,
                frac: if doc_len == 0 {
                    0.0
                } else {
                    dt.weight / doc_len as f64
                },
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(DocView {
        doc,
        citation: cite(record, CiteStyle::Html),
        uri: doc_uri(record, &vis.uri_proxy),
        doi: record.doi.clone(),
        doc_len,
        topics,
    })
}

/// GET /api/doc/:doc
pub async fn get_doc_view(
    State(state): State<AppState>,
    doc: Result<Path<usize>, PathRejection>,
) -> ApiResult<Json<DocView>> {
    let Path(doc) = doc?;
    let corpus = state.corpus.read().await;
    Ok(Json(doc_view(&corpus, &state.vis, doc)?))
}
