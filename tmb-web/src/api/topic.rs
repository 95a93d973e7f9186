//! Topic view: top words, top documents and the yearly plot

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde::Serialize;
use tmb_common::cite::{cite, doc_link, topic_label, topic_link, topic_plot_path, word_link, CiteStyle};
use tmb_common::vis::PlotConfig;
use tmb_common::{Artifact, Corpus, VisConfig};

use crate::error::{ApiError, ApiResult};
use crate::{require, AppState};

const TOPIC_ARTIFACTS: [Artifact; 4] = [
    Artifact::Meta,
    Artifact::DocTopics,
    Artifact::TopicWords,
    Artifact::DocLengths,
];

const YEARLY_ARTIFACTS: [Artifact; 3] = [Artifact::Meta, Artifact::DocTopics, Artifact::DocLengths];

#[derive(Debug, Serialize)]
pub struct TopicWordEntry {
    pub word: String,
    pub weight: f64,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct TopicDocEntry {
    pub doc: usize,
    /// HTML citation
    pub citation: String,
    pub link: String,
    pub weight: f64,
    pub frac: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct YearPoint {
    pub year: i32,
    pub value: f64,
}

/// How the client should draw the topic's yearly plot
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlotDescriptor {
    /// Pre-rendered image under the data directory
    Image { src: String, title: String },
    /// Data to draw a bar chart from
    Series {
        points: Vec<YearPoint>,
        geometry: PlotConfig,
    },
}

#[derive(Debug, Serialize)]
pub struct TopicView {
    /// Zero-based topic index
    pub topic: usize,
    pub label: String,
    pub alpha: f64,
    pub words: Vec<TopicWordEntry>,
    pub docs: Vec<TopicDocEntry>,
    pub plot: PlotDescriptor,
}

#[derive(Debug, Serialize)]
pub struct YearlyView {
    pub topic: usize,
    pub series: Vec<YearPoint>,
}

/// Convert a one-based topic number from a URL into an index
fn topic_index(number: usize) -> ApiResult<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| ApiError::NotFound(format!("topic {}", number)))
}

fn yearly_series(corpus: &Corpus, topic: usize) -> ApiResult<Vec<YearPoint>> {
    Ok(corpus
        .topic_yearly(topic)?
        .into_iter()
        .map(|(year, value)| YearPoint { year, value })
        .collect())
}

pub fn topic_view(corpus: &Corpus, vis: &VisConfig, topic: usize) -> ApiResult<TopicView> {
    require(corpus, &TOPIC_ARTIFACTS)?;
    if topic >= corpus.n_topics()? {
        return Err(ApiError::NotFound(format!("topic {}", topic + 1)));
    }

    let label = topic_label(topic, corpus.topic_words(topic, vis.overview_words)?);

    let words = corpus
        .topic_words(topic, vis.topic_view_words)?
        .iter()
        .map(|word| -> ApiResult<TopicWordEntry> {
            Ok(TopicWordEntry {
                weight: corpus.topic_word_weight(topic, word)?,
                link: word_link(word),
                word: word.clone(),
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    let docs = corpus
        .topic_docs(topic, vis.topic_view_docs)?
        .into_iter()
        .map(|td| -> ApiResult<TopicDocEntry> {
            Ok(TopicDocEntry {
                doc: td.doc,
                citation: cite(corpus.document(td.doc)?, CiteStyle::Html),
                link: doc_link(td.doc),
                weight: td.weight,
                frac: td.frac,
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    let plot = if vis.prefab_plots {
        PlotDescriptor::Image {
            src: topic_plot_path(topic),
            title: label.clone(),
        }
    } else {
        PlotDescriptor::Series {
            points: yearly_series(corpus, topic)?,
            geometry: vis.plot,
        }
    };

    Ok(TopicView {
        topic,
        alpha: corpus.alpha(topic)?,
        label,
        words,
        docs,
        plot,
    })
}

pub fn yearly_view(corpus: &Corpus, topic: usize) -> ApiResult<YearlyView> {
    require(corpus, &YEARLY_ARTIFACTS)?;
    Ok(YearlyView {
        topic,
        series: yearly_series(corpus, topic)?,
    })
}

/// GET /api/topic/:number
pub async fn get_topic_view(
    State(state): State<AppState>,
    number: Result<Path<usize>, PathRejection>,
) -> ApiResult<Json<TopicView>> {
    let Path(number) = number?;
    let topic = topic_index(number)?;
    let corpus = state.corpus.read().await;
    Ok(Json(topic_view(&corpus, &state.vis, topic)?))
}

/// GET /api/topic/:number/yearly
pub async fn get_topic_yearly(
    State(state): State<AppState>,
    number: Result<Path<usize>, PathRejection>,
) -> ApiResult<Json<YearlyView>> {
    let Path(number) = number?;
    let topic = topic_index(number)?;
    let corpus = state.corpus.read().await;
    Ok(Json(yearly_view(&corpus, topic)?))
}
