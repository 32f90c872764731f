use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::MovieId,
    services::interactions,
};

#[derive(Debug, Deserialize)]
pub struct TrackViewRequest {
    pub movie_id: MovieId,
}

#[derive(Debug, Serialize)]
pub struct InteractionsResponse {
    pub count: usize,
    /// Sorted ascending
    pub movie_ids: Vec<MovieId>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Records a movie view in the background and answers immediately
pub async fn track_view(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
    Json(request): Json<TrackViewRequest>,
) -> StatusCode {
    let store = state.store.clone();
    tokio::spawn(async move {
        if let Err(e) = interactions::track_view(store.as_ref(), &uid, request.movie_id).await {
            tracing::error!(uid = %uid, movie_id = request.movie_id, error = %e, "Failed to record view");
        }
    });

    StatusCode::ACCEPTED
}

pub async fn summary(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
) -> AppResult<Json<InteractionsResponse>> {
    let response = match interactions::interactions(state.store.as_ref(), &uid).await? {
        Some(record) => {
            let mut movie_ids: Vec<MovieId> = record.movie_ids.iter().copied().collect();
            movie_ids.sort_unstable();
            InteractionsResponse {
                count: movie_ids.len(),
                movie_ids,
                last_updated: Some(record.last_updated),
            }
        }
        None => InteractionsResponse {
            count: 0,
            movie_ids: Vec::new(),
            last_updated: None,
        },
    };

    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct HasInteractionsResponse {
    pub has_interactions: bool,
}

/// Whether the caller has viewed anything yet
pub async fn has_interactions(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
) -> AppResult<Json<HasInteractionsResponse>> {
    let has_interactions = interactions::has_interactions(state.store.as_ref(), &uid).await?;
    Ok(Json(HasInteractionsResponse { has_interactions }))
}
