use axum::{extract::State, Json};

use super::AppState;
use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::{SavePreferencesRequest, SavePreferencesResponse, UserPreferences},
    services::preferences,
};

pub async fn get(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
) -> AppResult<Json<UserPreferences>> {
    Ok(Json(preferences::get(state.store.as_ref(), &uid).await?))
}

/// Saves onboarding choices and bulk-adds the picked movies to the list
pub async fn save(
    State(state): State<AppState>,
    CurrentUser(uid): CurrentUser,
    Json(request): Json<SavePreferencesRequest>,
) -> AppResult<Json<SavePreferencesResponse>> {
    Ok(Json(preferences::save(state.store.as_ref(), &uid, request).await?))
}
