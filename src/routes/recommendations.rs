use axum::{extract::State, Json};

use super::AppState;
use crate::{middleware::CurrentUser, models::MovieSummary};

/// Personalized recommendations; an empty list when nothing can be produced
pub async fn personalized(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
) -> Json<Vec<MovieSummary>> {
    Json(state.recommendations.personalized(&uid).await)
}
