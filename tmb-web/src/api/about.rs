//! About page: model title and description

use axum::{extract::State, Json};
use serde::Serialize;
use tmb_common::{Artifact, Corpus};

use crate::error::ApiResult;
use crate::{require, AppState};

#[derive(Debug, Serialize)]
pub struct AboutView {
    pub title: String,
    /// HTML fragment
    pub meta_info: String,
}

pub fn about_view(corpus: &Corpus) -> ApiResult<AboutView> {
    require(corpus, &[Artifact::Info])?;
    let info = corpus.info()?;
    Ok(AboutView {
        title: info.title.clone(),
        meta_info: info.meta_info.clone(),
    })
}

/// GET /api/about
pub async fn get_about_view(State(state): State<AppState>) -> ApiResult<Json<AboutView>> {
    let corpus = state.corpus.read().await;
    Ok(Json(about_view(&corpus)?))
}
