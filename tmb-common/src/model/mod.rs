//! In-memory corpus model
//!
//! Holds the five artifacts a model export consists of. Each artifact is
//! installed at most once (by its loader) and only read afterwards. Accessors
//! that need an artifact which has not arrived yet return
//! [`Error::NotLoaded`], which the views turn into a loading response.

mod weights;

pub use weights::{parse_doc_len, DocTopicMatrix, TopicWordList, TopicWords};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

use crate::document::DocumentRecord;
use crate::{Error, Result};

/// Model export artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    /// `info.json`: title, description, view overrides
    Info,
    /// `meta.csv`: document metadata
    Meta,
    /// `dt.json`: document-topic weights
    DocTopics,
    /// `tw.json`: topic-word weights and alpha
    TopicWords,
    /// `doc_len.json`: tokens per document
    DocLengths,
}

impl Artifact {
    /// Every artifact, in load order
    pub const ALL: [Artifact; 5] = [
        Artifact::Info,
        Artifact::Meta,
        Artifact::DocTopics,
        Artifact::TopicWords,
        Artifact::DocLengths,
    ];

    /// File name inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Artifact::Info => "info.json",
            Artifact::Meta => "meta.csv",
            Artifact::DocTopics => "dt.json",
            Artifact::TopicWords => "tw.json",
            Artifact::DocLengths => "doc_len.json",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Read-only view over an indexed document collection
///
/// This is all the bibliography partitioner needs from the corpus.
pub trait DocumentSource {
    fn document_count(&self) -> usize;
    fn document(&self, index: usize) -> &DocumentRecord;
}

impl DocumentSource for [DocumentRecord] {
    fn document_count(&self) -> usize {
        self.len()
    }

    fn document(&self, index: usize) -> &DocumentRecord {
        &self[index]
    }
}

impl DocumentSource for Vec<DocumentRecord> {
    fn document_count(&self) -> usize {
        self.len()
    }

    fn document(&self, index: usize) -> &DocumentRecord {
        &self[index]
    }
}

/// Model description from `info.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub title: String,
    /// HTML fragment shown on the about page
    #[serde(default)]
    pub meta_info: String,
    /// View configuration overrides
    #[serde(default, rename = "VIS")]
    pub vis: Option<serde_json::Value>,
}

impl ModelInfo {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

/// A document's weight in a topic
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopicDoc {
    pub doc: usize,
    pub weight: f64,
    /// Weight as a fraction of the document's length
    pub frac: f64,
}

/// A topic's weight in a document
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DocTopic {
    pub topic: usize,
    pub weight: f64,
}

/// A word's position in a topic's word list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordTopic {
    pub topic: usize,
    /// Zero-based rank of the word in the topic
    pub rank: usize,
}

/// The corpus and model, possibly partially loaded
#[derive(Debug, Default)]
pub struct Corpus {
    info: Option<ModelInfo>,
    meta: Option<Vec<DocumentRecord>>,
    dt: Option<DocTopicMatrix>,
    tw: Option<TopicWords>,
    doc_len: Option<Vec<u64>>,
}

/// Install `value` into an empty slot; keep the existing value otherwise
fn install<T>(slot: &mut Option<T>, value: T, artifact: Artifact) -> bool {
    if slot.is_some() {
        warn!("{} already loaded; ignoring second copy", artifact);
        return false;
    }
    *slot = Some(value);
    true
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Installation (one write per artifact)
    // ------------------------------------------------------------------

    /// Returns false if info was already installed
    pub fn set_info(&mut self, info: ModelInfo) -> bool {
        install(&mut self.info, info, Artifact::Info)
    }

    pub fn set_meta(&mut self, meta: Vec<DocumentRecord>) -> bool {
        install(&mut self.meta, meta, Artifact::Meta)
    }

    pub fn set_dt(&mut self, dt: DocTopicMatrix) -> bool {
        install(&mut self.dt, dt, Artifact::DocTopics)
    }

    pub fn set_tw(&mut self, tw: TopicWords) -> bool {
        install(&mut self.tw, tw, Artifact::TopicWords)
    }

    pub fn set_doc_len(&mut self, doc_len: Vec<u64>) -> bool {
        install(&mut self.doc_len, doc_len, Artifact::DocLengths)
    }

    pub fn is_loaded(&self, artifact: Artifact) -> bool {
        match artifact {
            Artifact::Info => self.info.is_some(),
            Artifact::Meta => self.meta.is_some(),
            Artifact::DocTopics => self.dt.is_some(),
            Artifact::TopicWords => self.tw.is_some(),
            Artifact::DocLengths => self.doc_len.is_some(),
        }
    }

    /// The subset of `needed` that has not been installed yet
    pub fn missing(&self, needed: &[Artifact]) -> Vec<Artifact> {
        needed
            .iter()
            .copied()
            .filter(|a| !self.is_loaded(*a))
            .collect()
    }

    // ------------------------------------------------------------------
    // Raw artifact access
    // ------------------------------------------------------------------

    pub fn info(&self) -> Result<&ModelInfo> {
        self.info.as_ref().ok_or(Error::NotLoaded(Artifact::Info))
    }

    /// All document records, in index order
    pub fn documents(&self) -> Result<&[DocumentRecord]> {
        self.meta
            .as_deref()
            .ok_or(Error::NotLoaded(Artifact::Meta))
    }

    fn dt(&self) -> Result<&DocTopicMatrix> {
        self.dt.as_ref().ok_or(Error::NotLoaded(Artifact::DocTopics))
    }

    fn tw(&self) -> Result<&TopicWords> {
        self.tw.as_ref().ok_or(Error::NotLoaded(Artifact::TopicWords))
    }

    fn doc_lengths(&self) -> Result<&[u64]> {
        self.doc_len
            .as_deref()
            .ok_or(Error::NotLoaded(Artifact::DocLengths))
    }

    fn topic_list(&self, topic: usize) -> Result<&TopicWordList> {
        self.tw()?
            .topic(topic)
            .ok_or_else(|| Error::NotFound(format!("topic {}", topic + 1)))
    }

    fn check_doc(&self, doc: usize) -> Result<()> {
        if doc < self.n_docs()? {
            Ok(())
        } else {
            Err(Error::NotFound(format!("document {}", doc)))
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn n_docs(&self) -> Result<usize> {
        Ok(self.documents()?.len())
    }

    pub fn document(&self, doc: usize) -> Result<&DocumentRecord> {
        self.documents()?
            .get(doc)
            .ok_or_else(|| Error::NotFound(format!("document {}", doc)))
    }

    /// Number of topics
    pub fn n_topics(&self) -> Result<usize> {
        Ok(self.tw()?.n_topics())
    }

    /// Length of the longest topic word list
    pub fn n_top_words(&self) -> Result<usize> {
        Ok(self
            .tw()?
            .topics()
            .iter()
            .map(TopicWordList::len)
            .max()
            .unwrap_or(0))
    }

    /// First `n` words of a topic
    pub fn topic_words(&self, topic: usize, n: usize) -> Result<&[String]> {
        let words = self.topic_list(topic)?.words();
        Ok(&words[..n.min(words.len())])
    }

    /// Weight of `word` in a topic, 0 if the word is not among its top words
    pub fn topic_word_weight(&self, topic: usize, word: &str) -> Result<f64> {
        Ok(self.topic_list(topic)?.weight(word))
    }

    /// Topics listing `word`, by rank then topic
    pub fn word_topics(&self, word: &str) -> Result<Vec<WordTopic>> {
        let mut found: Vec<WordTopic> = self
            .tw()?
            .topics()
            .iter()
            .enumerate()
            .filter_map(|(topic, list)| list.rank(word).map(|rank| WordTopic { topic, rank }))
            .collect();
        found.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.topic.cmp(&b.topic)));
        Ok(found)
    }

    pub fn alpha(&self, topic: usize) -> Result<f64> {
        self.tw()?
            .alpha(topic)
            .ok_or_else(|| Error::NotFound(format!("topic {}", topic + 1)))
    }

    pub fn doc_len(&self, doc: usize) -> Result<u64> {
        self.doc_lengths()?
            .get(doc)
            .copied()
            .ok_or_else(|| Error::NotFound(format!("document {}", doc)))
    }

    pub fn doc_topic_weight(&self, doc: usize, topic: usize) -> Result<f64> {
        Ok(self.dt()?.weight(doc, topic))
    }

    /// Top `n` documents in a topic by weight; ties by document index
    pub fn topic_docs(&self, topic: usize, n: usize) -> Result<Vec<TopicDoc>> {
        let dt = self.dt()?;
        let lengths = self.doc_lengths()?;
        if topic >= dt.n_topics() {
            return Err(Error::NotFound(format!("topic {}", topic + 1)));
        }

        let mut docs: Vec<TopicDoc> = dt
            .topic_entries(topic)
            .map(|(doc, weight)| TopicDoc {
                doc,
                weight,
                frac: fraction(weight, lengths.get(doc).copied().unwrap_or(0)),
            })
            .collect();
        docs.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.doc.cmp(&b.doc)));
        docs.truncate(n);
        Ok(docs)
    }

    /// Top `n` non-zero topics in a document by weight; ties by topic index
    pub fn doc_topics(&self, doc: usize, n: usize) -> Result<Vec<DocTopic>> {
        let dt = self.dt()?;
        self.check_doc(doc)?;

        let mut topics: Vec<DocTopic> = (0..dt.n_topics())
            .map(|topic| DocTopic {
                topic,
                weight: dt.weight(doc, topic),
            })
            .filter(|t| t.weight > 0.0)
            .collect();
        topics.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.topic.cmp(&b.topic)));
        topics.truncate(n);
        Ok(topics)
    }

    /// Yearly proportion of a topic
    ///
    /// For each year, the topic's total weight over that year's documents
    /// divided by the total token count of that year's documents. Years
    /// without tokens are left out.
    pub fn topic_yearly(&self, topic: usize) -> Result<BTreeMap<i32, f64>> {
        use chrono::Datelike;

        let docs = self.documents()?;
        let dt = self.dt()?;
        let lengths = self.doc_lengths()?;
        if topic >= dt.n_topics() {
            return Err(Error::NotFound(format!("topic {}", topic + 1)));
        }

        let mut year_tokens: BTreeMap<i32, u64> = BTreeMap::new();
        for (doc, record) in docs.iter().enumerate() {
            let len = lengths.get(doc).copied().unwrap_or(0);
            *year_tokens.entry(record.date.year()).or_insert(0) += len;
        }

        let mut year_weight: BTreeMap<i32, f64> = BTreeMap::new();
        for (doc, weight) in dt.topic_entries(topic) {
            if let Some(record) = docs.get(doc) {
                *year_weight.entry(record.date.year()).or_insert(0.0) += weight;
            }
        }

        Ok(year_tokens
            .into_iter()
            .filter(|(_, tokens)| *tokens > 0)
            .map(|(year, tokens)| {
                let weight = year_weight.get(&year).copied().unwrap_or(0.0);
                (year, weight / tokens as f64)
            })
            .collect())
    }
}

fn fraction(weight: f64, len: u64) -> f64 {
    if len == 0 {
        0.0
    } else {
        weight / len as f64
    }
}
