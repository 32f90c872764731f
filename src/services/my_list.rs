//! The user's personal movie list: add, rate, annotate and remove.
//!
//! Edits are version-guarded so two concurrent edits of the same entry cannot
//! silently overwrite each other.
use chrono::Utc;

use crate::{
    db::{ConditionalWrite, UserStore},
    error::{AppError, AppResult},
    models::{AddToListRequest, MovieId, UpdateRatingRequest, UserListEntry, UserRating},
};

/// All entries, most recently added first
pub async fn list(store: &dyn UserStore, uid: &str) -> AppResult<Vec<UserListEntry>> {
    let mut entries = store.list_entries(uid).await?;
    entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
    Ok(entries)
}

pub async fn add(
    store: &dyn UserStore,
    uid: &str,
    request: AddToListRequest,
) -> AppResult<UserListEntry> {
    let now = Utc::now();

    let rating = if request.status.is_some() || request.score.is_some() || request.note.is_some() {
        let rating = UserRating {
            status: request.status.unwrap_or_default(),
            score: request.score,
            note: request.note.as_deref().map(str::trim).unwrap_or_default().to_string(),
            date_added: now,
        };
        rating.validate()?;
        Some(rating)
    } else {
        None
    };

    let entry = UserListEntry {
        movie_id: request.movie_id,
        movie: request.movie,
        rating,
        added_at: now,
        version: 0,
    };

    if !store.insert_list_entry(uid, &entry).await? {
        return Err(AppError::Conflict(format!(
            "Movie {} is already in your list",
            request.movie_id
        )));
    }

    tracing::info!(uid = %uid, movie_id = entry.movie_id, rated = entry.score().is_some(), "Added to list");
    Ok(entry)
}

pub async fn update_rating(
    store: &dyn UserStore,
    uid: &str,
    movie_id: MovieId,
    patch: UpdateRatingRequest,
) -> AppResult<UserListEntry> {
    let current = store
        .list_entry(uid, movie_id)
        .await?
        .ok_or_else(|| not_listed(movie_id))?;

    if current.version != patch.expected_version {
        return Err(stale(movie_id, current.version));
    }

    let updated = patch.apply(&current, Utc::now())?;

    match store
        .replace_list_entry(uid, &updated, patch.expected_version)
        .await?
    {
        ConditionalWrite::Applied => {
            tracing::info!(uid = %uid, movie_id, version = updated.version, "List entry updated");
            Ok(updated)
        }
        ConditionalWrite::Missing => Err(not_listed(movie_id)),
        ConditionalWrite::VersionMismatch => {
            tracing::warn!(uid = %uid, movie_id, "Concurrent list edit rejected");
            Err(AppError::Conflict(format!(
                "Entry for movie {} was modified concurrently",
                movie_id
            )))
        }
    }
}

pub async fn remove(store: &dyn UserStore, uid: &str, movie_id: MovieId) -> AppResult<()> {
    if !store.remove_list_entry(uid, movie_id).await? {
        return Err(not_listed(movie_id));
    }
    tracing::info!(uid = %uid, movie_id, "Removed from list");
    Ok(())
}

fn not_listed(movie_id: MovieId) -> AppError {
    AppError::NotFound(format!("Movie {} is not in your list", movie_id))
}

fn stale(movie_id: MovieId, current: u64) -> AppError {
    AppError::Conflict(format!(
        "Entry for movie {} is at version {}, reload and retry",
        movie_id, current
    ))
}
