use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MovieId, MovieSummary};
use crate::error::{AppError, AppResult};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

/// Where a movie stands in the user's list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    #[serde(alias = "Plan to Watch")]
    PlanToWatch,
    #[serde(alias = "Completed")]
    Completed,
    #[serde(alias = "Dropped")]
    Dropped,
}

impl Default for WatchStatus {
    fn default() -> Self {
        Self::PlanToWatch
    }
}

/// The user's rating of a listed movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRating {
    #[serde(default)]
    pub status: WatchStatus,
    /// Score from 1 to 10
    pub score: Option<u8>,
    #[serde(default)]
    pub note: String,
    pub date_added: DateTime<Utc>,
}

impl UserRating {
    pub fn validate(&self) -> AppResult<()> {
        validate_score(self.score)
    }
}

pub fn validate_score(score: Option<u8>) -> AppResult<()> {
    match score {
        Some(s) if !(MIN_SCORE..=MAX_SCORE).contains(&s) => Err(AppError::InvalidInput(format!(
            "Score must be between {} and {}",
            MIN_SCORE, MAX_SCORE
        ))),
        _ => Ok(()),
    }
}

/// A movie saved to the user's personal list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserListEntry {
    pub movie_id: MovieId,
    /// Snapshot of the movie taken when it was added, for display
    #[serde(default)]
    pub movie: Option<MovieSummary>,
    #[serde(default)]
    pub rating: Option<UserRating>,
    pub added_at: DateTime<Utc>,
    /// Incremented on every successful edit; guards conditional writes
    #[serde(default)]
    pub version: u64,
}

impl UserListEntry {
    /// The user's score, if the entry is rated
    pub fn score(&self) -> Option<u8> {
        self.rating.as_ref().and_then(|r| r.score)
    }
}

/// Body of an "add to list" request
#[derive(Debug, Clone, Deserialize)]
pub struct AddToListRequest {
    pub movie_id: MovieId,
    #[serde(default)]
    pub movie: Option<MovieSummary>,
    #[serde(default)]
    pub status: Option<WatchStatus>,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Partial rating edit, applied only if `expected_version` still matches
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRatingRequest {
    pub expected_version: u64,
    #[serde(default)]
    pub status: Option<WatchStatus>,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub note: Option<String>,
}

impl UpdateRatingRequest {
    /// Applies the patch to `entry`, producing the next version
    pub fn apply(&self, entry: &UserListEntry, now: DateTime<Utc>) -> AppResult<UserListEntry> {
        validate_score(self.score)?;

        let mut rating = entry.rating.clone().unwrap_or(UserRating {
            status: WatchStatus::default(),
            score: None,
            note: String::new(),
            date_added: now,
        });

        if let Some(status) = self.status {
            rating.status = status;
        }
        if let Some(score) = self.score {
            rating.score = Some(score);
        }
        if let Some(note) = &self.note {
            rating.note = note.trim().to_string();
        }

        Ok(UserListEntry {
            rating: Some(rating),
            version: entry.version + 1,
            ..entry.clone()
        })
    }
}
