use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MovieId, MovieSummary, UserListEntry};

/// Score given to an onboarding pick the user did not rate
pub const DEFAULT_PICK_SCORE: u8 = 10;

/// Taste profile captured during onboarding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPreferences {
    /// Preferred TMDB genre ids
    #[serde(default)]
    pub genres: Vec<u32>,
    pub last_updated: DateTime<Utc>,
}

/// A movie the user picked as a favourite during onboarding
#[derive(Debug, Clone, Deserialize)]
pub struct PreferredMovie {
    pub movie_id: MovieId,
    #[serde(default)]
    pub movie: Option<MovieSummary>,
    /// Defaults to [`DEFAULT_PICK_SCORE`]
    #[serde(default)]
    pub score: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavePreferencesRequest {
    #[serde(default)]
    pub genres: Vec<u32>,
    #[serde(default)]
    pub movies: Vec<PreferredMovie>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavePreferencesResponse {
    pub preferences: UserPreferences,
    /// Entries created in the personal list
    pub added: Vec<UserListEntry>,
    /// Picks that were already listed and left untouched
    pub already_listed: Vec<MovieId>,
}
