use axum::{extract::State, http::StatusCode, Json};

use super::AppState;
use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::{RegisterProfileRequest, UpdateProfileRequest, UserProfile},
    services::profiles,
};

pub async fn get(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(profiles::get(state.store.as_ref(), &uid).await?))
}

/// Registers the caller; repeating it for a known uid returns the stored profile
pub async fn register(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
    Json(request): Json<RegisterProfileRequest>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    let profile = profiles::register(state.store.as_ref(), &uid, request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(profiles::update(state.store.as_ref(), &uid, request).await?))
}
