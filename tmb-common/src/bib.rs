//! Bibliography partitioning
//!
//! Orders a document collection for display as a sectioned list: a major
//! sort groups documents under headings (decade, year or lead-author
//! initial), and a minor sort orders the documents within each heading.
//!
//! The partitioner is a pure function of the documents and the chosen
//! strategies, so results can be memoized per strategy pair for a given
//! metadata snapshot.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::cmp;
use tracing::warn;

use crate::document::DocumentRecord;
use crate::model::DocumentSource;

/// Label used for documents without authors
pub const ANON_LABEL: &str = "[Anon]";

/// Grouping dimension for headings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MajorSort {
    Decade,
    Year,
    Alpha,
}

impl MajorSort {
    /// Resolve a preference name; unknown names fall back to `Alpha`
    pub fn from_name(name: &str) -> Self {
        match name {
            "decade" => MajorSort::Decade,
            "year" => MajorSort::Year,
            "alpha" => MajorSort::Alpha,
            other => {
                warn!("Unknown bib_sort major: {}; defaulting to alpha", other);
                MajorSort::Alpha
            }
        }
    }

    /// Heading a document falls under
    pub fn group_key(&self, doc: &DocumentRecord) -> String {
        match self {
            MajorSort::Decade => format!("{}0s", doc.date.year().div_euclid(10)),
            MajorSort::Year => doc.date.year().to_string(),
            MajorSort::Alpha => sort_key(doc),
        }
    }

    /// Heading for a document whose sort key is already known
    fn heading(&self, doc: &DocumentRecord, key: &str) -> String {
        match self {
            MajorSort::Alpha => key.to_string(),
            _ => self.group_key(doc),
        }
    }

    /// Order used before splitting into groups
    ///
    /// Decade and year grouping sort by the full date, not by the heading.
    fn compare<S>(&self, documents: &S, keys: &[String], a: usize, b: usize) -> cmp::Ordering
    where
        S: DocumentSource + ?Sized,
    {
        match self {
            MajorSort::Decade | MajorSort::Year => {
                documents.document(a).date.cmp(&documents.document(b).date)
            }
            MajorSort::Alpha => keys[a].cmp(&keys[b]),
        }
    }
}

/// Ordering within a heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinorSort {
    Date,
    Alpha,
}

impl MinorSort {
    /// Resolve a preference name; unknown names fall back to `Alpha`
    pub fn from_name(name: &str) -> Self {
        match name {
            "date" => MinorSort::Date,
            "alpha" => MinorSort::Alpha,
            other => {
                warn!("Unknown bib_sort minor: {}; defaulting to alpha", other);
                MinorSort::Alpha
            }
        }
    }

    fn compare<S>(&self, documents: &S, keys: &[String], a: usize, b: usize) -> cmp::Ordering
    where
        S: DocumentSource + ?Sized,
    {
        match self {
            MinorSort::Date => documents.document(a).date.cmp(&documents.document(b).date),
            MinorSort::Alpha => keys[a].cmp(&keys[b]),
        }
    }
}

/// A resolved (major, minor) strategy pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BibSort {
    pub major: MajorSort,
    pub minor: MinorSort,
}

impl BibSort {
    pub fn new(major: MajorSort, minor: MinorSort) -> Self {
        Self { major, minor }
    }

    /// Resolve preference names, logging and defaulting unknown ones
    pub fn from_names(major: &str, minor: &str) -> Self {
        Self {
            major: MajorSort::from_name(major),
            minor: MinorSort::from_name(minor),
        }
    }
}

/// Partitioned bibliography
///
/// `headings[k]` labels the run of document indices `docs[k]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ordering {
    pub headings: Vec<String>,
    pub docs: Vec<Vec<usize>>,
}

impl Ordering {
    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// (heading, document run) pairs in display order
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.headings
            .iter()
            .map(String::as_str)
            .zip(self.docs.iter().map(Vec::as_slice))
    }
}

/// Alphabetical sort key of a document
///
/// The uppercased first character of the lead author's last name token, or
/// `"[Anon]"` when there is no lead author. Suffixes such as "Jr." are taken
/// as the surname.
pub fn sort_key(doc: &DocumentRecord) -> String {
    match doc.lead_author_parts() {
        Some((surname, _)) => surname
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default(),
        None => ANON_LABEL.to_string(),
    }
}

/// Partition a document collection into headed, sorted runs
///
/// Every document index appears in exactly one run. Heading order follows
/// the major comparator; both sorts are stable.
pub fn partition<S>(documents: &S, sort: BibSort) -> Ordering
where
    S: DocumentSource + ?Sized,
{
    let n = documents.document_count();
    // one key per document, shared by both sorts and the boundary scan
    let keys: Vec<String> = (0..n).map(|i| sort_key(documents.document(i))).collect();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| sort.major.compare(documents, &keys, a, b));

    let mut headings = Vec::new();
    let mut boundaries = Vec::new();
    let mut previous: Option<String> = None;
    for (pos, &doc) in order.iter().enumerate() {
        let key = sort.major.heading(documents.document(doc), &keys[doc]);
        if previous.as_ref() != Some(&key) {
            boundaries.push(pos);
            headings.push(key.clone());
            previous = Some(key);
        }
    }

    let mut docs = Vec::with_capacity(headings.len());
    for (k, &start) in boundaries.iter().enumerate() {
        let end = boundaries.get(k + 1).copied().unwrap_or(n);
        let mut run = order[start..end].to_vec();
        run.sort_by(|&a, &b| sort.minor.compare(documents, &keys, a, b));
        docs.push(run);
    }

    Ordering { headings, docs }
}
