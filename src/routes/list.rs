use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::AppState;
use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::{AddToListRequest, MovieId, UpdateRatingRequest, UserListEntry},
    services::my_list,
};

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
) -> AppResult<Json<Vec<UserListEntry>>> {
    Ok(Json(my_list::list(state.store.as_ref(), &uid).await?))
}

pub async fn add(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
    Json(request): Json<AddToListRequest>,
) -> AppResult<(StatusCode, Json<UserListEntry>)> {
    let entry = my_list::add(state.store.as_ref(), &uid, request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
    Path(movie_id): Path<MovieId>,
    Json(patch): Json<UpdateRatingRequest>,
) -> AppResult<Json<UserListEntry>> {
    let entry = my_list::update_rating(state.store.as_ref(), &uid, movie_id, patch).await?;
    Ok(Json(entry))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
    Path(movie_id): Path<MovieId>,
) -> AppResult<StatusCode> {
    my_list::remove(state.store.as_ref(), &uid, movie_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
