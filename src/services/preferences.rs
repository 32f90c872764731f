//! Onboarding: preferred genres plus favourite movies.
//!
//! Favourite picks land in the personal list as completed and scored, so the
//! content-based path can seed from them before the user has rated anything.
use std::collections::HashSet;

use chrono::Utc;

use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    models::{
        preferences::DEFAULT_PICK_SCORE, user_list::validate_score, SavePreferencesRequest,
        SavePreferencesResponse, UserListEntry, UserPreferences, UserRating, WatchStatus,
    },
};

pub async fn get(store: &dyn UserStore, uid: &str) -> AppResult<UserPreferences> {
    store
        .preferences(uid)
        .await?
        .ok_or_else(|| AppError::NotFound("No preferences saved".to_string()))
}

/// Stores the genre selection and adds every picked movie to the list
///
/// Picks already in the list are left as they are and reported back.
pub async fn save(
    store: &dyn UserStore,
    uid: &str,
    request: SavePreferencesRequest,
) -> AppResult<SavePreferencesResponse> {
    for pick in &request.movies {
        validate_score(pick.score)?;
    }

    let now = Utc::now();

    let mut seen_genres = HashSet::new();
    let preferences = UserPreferences {
        genres: request
            .genres
            .into_iter()
            .filter(|g| seen_genres.insert(*g))
            .collect(),
        last_updated: now,
    };
    store.save_preferences(uid, &preferences).await?;

    let mut added = Vec::new();
    let mut already_listed = Vec::new();
    let mut seen_movies = HashSet::new();

    for pick in request.movies {
        if !seen_movies.insert(pick.movie_id) {
            continue;
        }

        let entry = UserListEntry {
            movie_id: pick.movie_id,
            movie: pick.movie,
            rating: Some(UserRating {
                status: WatchStatus::Completed,
                score: Some(pick.score.unwrap_or(DEFAULT_PICK_SCORE)),
                note: String::new(),
                date_added: now,
            }),
            added_at: now,
            version: 0,
        };

        if store.insert_list_entry(uid, &entry).await? {
            added.push(entry);
        } else {
            already_listed.push(pick.movie_id);
        }
    }

    tracing::info!(
        uid = %uid,
        genres = preferences.genres.len(),
        added = added.len(),
        already_listed = already_listed.len(),
        "Preferences saved"
    );

    Ok(SavePreferencesResponse {
        preferences,
        added,
        already_listed,
    })
}
