use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    db::store::{ConditionalWrite, UserStore},
    error::AppResult,
    models::{MovieId, UserInteractionRecord, UserListEntry, UserPreferences, UserProfile},
};

/// In-process document store, used for local runs and tests
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    interactions: HashMap<String, UserInteractionRecord>,
    lists: HashMap<String, HashMap<MovieId, UserListEntry>>,
    profiles: HashMap<String, UserProfile>,
    preferences: HashMap<String, UserPreferences>,
    usernames: HashMap<String, String>,
    emails: HashMap<String, String>,
    user_counter: u64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn claim(claims: &mut HashMap<String, String>, uid: &str, value: &str) -> bool {
    let owner = claims
        .entry(value.to_lowercase())
        .or_insert_with(|| uid.to_string());
    owner.as_str() == uid
}

fn release(claims: &mut HashMap<String, String>, uid: &str, value: &str) {
    let key = value.to_lowercase();
    if claims.get(&key).map(String::as_str) == Some(uid) {
        claims.remove(&key);
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn interactions(&self, uid: &str) -> AppResult<Option<UserInteractionRecord>> {
        Ok(self.inner.read().await.interactions.get(uid).cloned())
    }

    async fn record_interaction(
        &self,
        uid: &str,
        movie_id: MovieId,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let record = inner
            .interactions
            .entry(uid.to_string())
            .or_insert_with(|| UserInteractionRecord::empty(at));
        Ok(record.record(movie_id, at))
    }

    async fn ensure_interaction_record(&self, uid: &str, at: DateTime<Utc>) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .interactions
            .entry(uid.to_string())
            .or_insert_with(|| UserInteractionRecord::empty(at));
        Ok(())
    }

    async fn list_entries(&self, uid: &str) -> AppResult<Vec<UserListEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .lists
            .get(uid)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_entry(&self, uid: &str, movie_id: MovieId) -> AppResult<Option<UserListEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .lists
            .get(uid)
            .and_then(|entries| entries.get(&movie_id))
            .cloned())
    }

    async fn insert_list_entry(&self, uid: &str, entry: &UserListEntry) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let entries = inner.lists.entry(uid.to_string()).or_default();
        if entries.contains_key(&entry.movie_id) {
            return Ok(false);
        }
        entries.insert(entry.movie_id, entry.clone());
        Ok(true)
    }

    async fn replace_list_entry(
        &self,
        uid: &str,
        entry: &UserListEntry,
        expected_version: u64,
    ) -> AppResult<ConditionalWrite> {
        let mut inner = self.inner.write().await;
        let Some(current) = inner
            .lists
            .get_mut(uid)
            .and_then(|entries| entries.get_mut(&entry.movie_id))
        else {
            return Ok(ConditionalWrite::Missing);
        };

        if current.version != expected_version {
            return Ok(ConditionalWrite::VersionMismatch);
        }

        *current = entry.clone();
        Ok(ConditionalWrite::Applied)
    }

    async fn remove_list_entry(&self, uid: &str, movie_id: MovieId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .lists
            .get_mut(uid)
            .and_then(|entries| entries.remove(&movie_id))
            .is_some())
    }

    async fn profile(&self, uid: &str) -> AppResult<Option<UserProfile>> {
        Ok(self.inner.read().await.profiles.get(uid).cloned())
    }

    async fn save_profile(&self, profile: &UserProfile) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.profiles.insert(profile.uid.clone(), profile.clone());
        Ok(())
    }

    async fn claim_username(&self, uid: &str, username: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(claim(&mut inner.usernames, uid, username))
    }

    async fn release_username(&self, uid: &str, username: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        release(&mut inner.usernames, uid, username);
        Ok(())
    }

    async fn claim_email(&self, uid: &str, email: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(claim(&mut inner.emails, uid, email))
    }

    async fn release_email(&self, uid: &str, email: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        release(&mut inner.emails, uid, email);
        Ok(())
    }

    async fn preferences(&self, uid: &str) -> AppResult<Option<UserPreferences>> {
        Ok(self.inner.read().await.preferences.get(uid).cloned())
    }

    async fn save_preferences(&self, uid: &str, preferences: &UserPreferences) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.preferences.insert(uid.to_string(), preferences.clone());
        Ok(())
    }

    async fn next_user_id(&self) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        inner.user_counter += 1;
        Ok(inner.user_counter)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
