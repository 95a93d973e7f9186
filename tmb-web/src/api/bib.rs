//! Bibliography view

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tmb_common::bib::{BibSort, MajorSort, MinorSort};
use tmb_common::cite::{cite, doc_link, CiteStyle};
use tmb_common::{Artifact, Corpus};

use crate::error::ApiResult;
use crate::{require, AppState};

/// Optional per-request sort override
#[derive(Debug, Default, Deserialize)]
pub struct BibQuery {
    pub major: Option<String>,
    pub minor: Option<String>,
}

impl BibQuery {
    /// Strategy pair for this request, falling back to the configured one
    pub fn resolve(&self, configured: BibSort) -> BibSort {
        BibSort {
            major: self
                .major
                .as_deref()
                .map(MajorSort::from_name)
                .unwrap_or(configured.major),
            minor: self
                .minor
                .as_deref()
                .map(MinorSort::from_name)
                .unwrap_or(configured.minor),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BibEntry {
    pub doc: usize,
    pub citation: String,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct BibSection {
    pub heading: String,
    pub docs: Vec<BibEntry>,
}

#[derive(Debug, Serialize)]
pub struct BibView {
    pub major: MajorSort,
    pub minor: MinorSort,
    pub sections: Vec<BibSection>,
}

pub fn bib_view(state: &AppState, corpus: &Corpus, sort: BibSort) -> ApiResult<BibView> {
    require(corpus, &[Artifact::Meta])?;

    let ordering = state.bib_ordering(corpus, sort)?;
    let sections = ordering
        .sections()
        .map(|(heading, docs)| -> ApiResult<BibSection> {
            let docs = docs
                .iter()
                .map(|&doc| -> ApiResult<BibEntry> {
                    Ok(BibEntry {
                        doc,
                        citation: cite(corpus.document(doc)?, CiteStyle::Html),
                        link: doc_link(doc),
                    })
                })
                .collect::<ApiResult<Vec<_>>>()?;
            Ok(BibSection {
                heading: heading.to_string(),
                docs,
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(BibView {
        major: sort.major,
        minor: sort.minor,
        sections,
    })
}

/// GET /api/bib?major=&minor=
pub async fn get_bib_view(
    State(state): State<AppState>,
    query: Result<Query<BibQuery>, QueryRejection>,
) -> ApiResult<Json<BibView>> {
    let Query(query) = query?;
    let sort = query.resolve(state.vis.bib_sort());
    let corpus = state.corpus.read().await;
    Ok(Json(bib_view(&state, &corpus, sort)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_overrides_configured_sort() {
        let configured = BibSort::new(MajorSort::Year, MinorSort::Alpha);

        let query = BibQuery {
            major: Some("decade".to_string()),
            minor: None,
        };
        assert_eq!(
            query.resolve(configured),
            BibSort::new(MajorSort::Decade, MinorSort::Alpha)
        );

        assert_eq!(BibQuery::default().resolve(configured), configured);
    }

    #[test]
    fn test_query_unknown_name_falls_back_to_alpha() {
        let configured = BibSort::new(MajorSort::Year, MinorSort::Date);
        let query = BibQuery {
            major: Some("galaxy".to_string()),
            minor: Some("date".to_string()),
        };
        assert_eq!(
            query.resolve(configured),
            BibSort::new(MajorSort::Alpha, MinorSort::Date)
        );
    }
}
