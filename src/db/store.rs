//! Per-user document store
//!
//! Every mutation maps onto a single atomic primitive of the backing store
//! (set-add, set-if-absent, compare-and-set, counter increment). Callers never
//! read a whole document, modify it and write it back.
use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{MovieId, UserInteractionRecord, UserListEntry, UserPreferences, UserProfile},
};

/// Outcome of a version-guarded write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalWrite {
    Applied,
    /// No document exists at the target
    Missing,
    /// The stored version differs from the expected one
    VersionMismatch,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Reads the user's interaction record, `None` if it was never created
    async fn interactions(&self, uid: &str) -> AppResult<Option<UserInteractionRecord>>;

    /// Adds a movie id to the user's interaction record, creating the record if needed
    ///
    /// Returns true if the id was newly added.
    async fn record_interaction(
        &self,
        uid: &str,
        movie_id: MovieId,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Creates an empty interaction record if none exists
    async fn ensure_interaction_record(&self, uid: &str, at: DateTime<Utc>) -> AppResult<()>;

    async fn list_entries(&self, uid: &str) -> AppResult<Vec<UserListEntry>>;

    async fn list_entry(&self, uid: &str, movie_id: MovieId) -> AppResult<Option<UserListEntry>>;

    /// Stores an entry unless one already exists for the same movie
    ///
    /// Returns false if the movie was already listed.
    async fn insert_list_entry(&self, uid: &str, entry: &UserListEntry) -> AppResult<bool>;

    /// Replaces an entry only if its stored version equals `expected_version`
    async fn replace_list_entry(
        &self,
        uid: &str,
        entry: &UserListEntry,
        expected_version: u64,
    ) -> AppResult<ConditionalWrite>;

    /// Returns false if no entry existed
    async fn remove_list_entry(&self, uid: &str, movie_id: MovieId) -> AppResult<bool>;

    async fn profile(&self, uid: &str) -> AppResult<Option<UserProfile>>;

    async fn save_profile(&self, profile: &UserProfile) -> AppResult<()>;

    /// Claims a username for `uid`, case-insensitively
    ///
    /// Returns true if the name is now held by `uid` (newly or already).
    async fn claim_username(&self, uid: &str, username: &str) -> AppResult<bool>;

    async fn release_username(&self, uid: &str, username: &str) -> AppResult<()>;

    /// Claims an email address for `uid`, same semantics as [`UserStore::claim_username`]
    async fn claim_email(&self, uid: &str, email: &str) -> AppResult<bool>;

    async fn release_email(&self, uid: &str, email: &str) -> AppResult<()>;

    async fn preferences(&self, uid: &str) -> AppResult<Option<UserPreferences>>;

    async fn save_preferences(&self, uid: &str, preferences: &UserPreferences) -> AppResult<()>;

    /// Next value of the sequential platform user id, starting at 1
    async fn next_user_id(&self) -> AppResult<u64>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
