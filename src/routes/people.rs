use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{movies::SearchQuery, AppState};
use crate::{
    error::AppResult,
    models::{Person, PersonCredits, PersonDetails, PersonId},
};

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<Person>>> {
    Ok(Json(state.metadata.search_people(&params.q).await?))
}

pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<PersonId>,
) -> AppResult<Json<PersonDetails>> {
    Ok(Json(state.metadata.person_details(id).await?))
}

pub async fn movie_credits(
    State(state): State<AppState>,
    Path(id): Path<PersonId>,
) -> AppResult<Json<PersonCredits>> {
    Ok(Json(state.metadata.person_movie_credits(id).await?))
}
