//! Weight artifacts: doc-topic matrix, topic-word lists, document lengths

use serde::Deserialize;
use std::collections::HashMap;

use super::Artifact;
use crate::{Error, Result};

/// Document-topic weights in compressed sparse column form
///
/// Topic `t` owns entries `p[t]..p[t + 1]` of `i` (document indices) and
/// `x` (weights).
#[derive(Debug, Clone, Deserialize)]
pub struct DocTopicMatrix {
    i: Vec<usize>,
    p: Vec<usize>,
    x: Vec<f64>,
}

impl DocTopicMatrix {
    /// Decode and validate `dt.json`
    pub fn from_json(input: &str) -> Result<Self> {
        let matrix: Self = serde_json::from_str(input)?;
        matrix.validate()?;
        Ok(matrix)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |message: String| Error::Parse {
            artifact: Artifact::DocTopics,
            row: 0,
            message,
        };

        if self.i.len() != self.x.len() {
            return Err(invalid(format!(
                "index/value length mismatch: {} vs {}",
                self.i.len(),
                self.x.len()
            )));
        }
        if self.p.first() != Some(&0) {
            return Err(invalid("column pointers must start at 0".to_string()));
        }
        if self.p.windows(2).any(|w| w[0] > w[1]) {
            return Err(invalid("column pointers must be non-decreasing".to_string()));
        }
        if self.p.last() != Some(&self.x.len()) {
            return Err(invalid(format!(
                "last column pointer must equal entry count {}",
                self.x.len()
            )));
        }
        Ok(())
    }

    /// Number of topics (columns)
    pub fn n_topics(&self) -> usize {
        self.p.len().saturating_sub(1)
    }

    /// Non-zero (document, weight) entries of one topic
    pub fn topic_entries(&self, topic: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (start, end) = if topic < self.n_topics() {
            (self.p[topic], self.p[topic + 1])
        } else {
            (0, 0)
        };
        self.i[start..end]
            .iter()
            .copied()
            .zip(self.x[start..end].iter().copied())
    }

    /// Weight of `topic` in `doc`, 0 if absent
    pub fn weight(&self, doc: usize, topic: usize) -> f64 {
        self.topic_entries(topic)
            .find(|(d, _)| *d == doc)
            .map(|(_, w)| w)
            .unwrap_or(0.0)
    }
}

/// Top words of one topic
#[derive(Debug, Clone)]
pub struct TopicWordList {
    words: Vec<String>,
    weights: Vec<f64>,
    /// word -> rank (index into `words`)
    ranks: HashMap<String, usize>,
}

impl TopicWordList {
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Zero-based rank of `word`, if it is among this topic's words
    pub fn rank(&self, word: &str) -> Option<usize> {
        self.ranks.get(word).copied()
    }

    /// Weight of `word`, 0 if absent
    pub fn weight(&self, word: &str) -> f64 {
        self.rank(word).map(|r| self.weights[r]).unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize)]
struct RawTopicWords {
    alpha: Vec<f64>,
    tw: Vec<RawTopic>,
}

#[derive(Debug, Deserialize)]
struct RawTopic {
    words: Vec<String>,
    weights: Vec<f64>,
}

/// Topic-word weights and per-topic alpha (`tw.json`)
#[derive(Debug, Clone)]
pub struct TopicWords {
    alpha: Vec<f64>,
    topics: Vec<TopicWordList>,
}

impl TopicWords {
    /// Decode and validate `tw.json`
    pub fn from_json(input: &str) -> Result<Self> {
        let raw: RawTopicWords = serde_json::from_str(input)?;

        if raw.alpha.len() != raw.tw.len() {
            return Err(Error::Parse {
                artifact: Artifact::TopicWords,
                row: 0,
                message: format!(
                    "{} alpha values for {} topics",
                    raw.alpha.len(),
                    raw.tw.len()
                ),
            });
        }

        let mut topics = Vec::with_capacity(raw.tw.len());
        for (t, topic) in raw.tw.into_iter().enumerate() {
            if topic.words.len() != topic.weights.len() {
                return Err(Error::Parse {
                    artifact: Artifact::TopicWords,
                    row: t,
                    message: format!(
                        "{} words but {} weights",
                        topic.words.len(),
                        topic.weights.len()
                    ),
                });
            }
            let mut ranks = HashMap::with_capacity(topic.words.len());
            for (rank, word) in topic.words.iter().enumerate() {
                // first occurrence wins
                ranks.entry(word.clone()).or_insert(rank);
            }
            topics.push(TopicWordList {
                words: topic.words,
                weights: topic.weights,
                ranks,
            });
        }

        Ok(Self {
            alpha: raw.alpha,
            topics,
        })
    }

    pub fn n_topics(&self) -> usize {
        self.topics.len()
    }

    pub fn topic(&self, topic: usize) -> Option<&TopicWordList> {
        self.topics.get(topic)
    }

    pub fn topics(&self) -> &[TopicWordList] {
        &self.topics
    }

    pub fn alpha(&self, topic: usize) -> Option<f64> {
        self.alpha.get(topic).copied()
    }
}

#[derive(Debug, Deserialize)]
struct DocLenFile {
    doc_len: Vec<u64>,
}

/// Decode `doc_len.json`
pub fn parse_doc_len(input: &str) -> Result<Vec<u64>> {
    let file: DocLenFile = serde_json::from_str(input)?;
    Ok(file.doc_len)
}
