//! Server-Sent Events (SSE) for artifact load notifications

use crate::AppState;
use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

/// GET /api/events - SSE event stream
///
/// Streams events:
/// - ConnectionStatus (on connect)
/// - ArtifactLoaded / ArtifactFailed (as background loads finish)
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tmb_common::sse::create_event_sse_stream("tmb-web", &state.events)
}
