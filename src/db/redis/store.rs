//! Redis-backed document store
//!
//! Layout:
//! - `interactions:{uid}`          SET of movie ids
//! - `interactions:{uid}:updated`  RFC 3339 timestamp, marks that the record exists
//! - `mylist:{uid}`                HASH movie_id → JSON entry
//! - `profile:{uid}`               JSON profile
//! - `preferences:{uid}`           JSON onboarding preferences
//! - `usernames`, `emails`         HASH lowercased value → uid
//! - `counters:users`              sequential user id counter
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};
use std::collections::HashSet;

use crate::{
    db::store::{ConditionalWrite, UserStore},
    error::{AppError, AppResult},
    models::{MovieId, UserInteractionRecord, UserListEntry, UserPreferences, UserProfile},
};

const USERNAMES_KEY: &str = "usernames";
const EMAILS_KEY: &str = "emails";
const USER_COUNTER_KEY: &str = "counters:users";

/// Replaces a list entry only when the stored JSON carries the expected version.
/// Returns 1 when applied, 0 on version mismatch, -1 when the entry is missing.
const REPLACE_IF_VERSION: &str = r#"
local current = redis.call('HGET', KEYS[1], ARGV[1])
if not current then
    return -1
end
local stored = cjson.decode(current)['version'] or 0
if tonumber(stored) ~= tonumber(ARGV[2]) then
    return 0
end
redis.call('HSET', KEYS[1], ARGV[1], ARGV[3])
return 1
"#;

/// Deletes a claim only if it is still held by the given uid
const RELEASE_CLAIM: &str = r#"
if redis.call('HGET', KEYS[1], ARGV[1]) == ARGV[2] then
    return redis.call('HDEL', KEYS[1], ARGV[1])
end
return 0
"#;

fn interactions_key(uid: &str) -> String {
    format!("interactions:{}", uid)
}

fn interactions_updated_key(uid: &str) -> String {
    format!("interactions:{}:updated", uid)
}

fn list_key(uid: &str) -> String {
    format!("mylist:{}", uid)
}

fn profile_key(uid: &str) -> String {
    format!("profile:{}", uid)
}

fn preferences_key(uid: &str) -> String {
    format!("preferences:{}", uid)
}

fn to_json<T: serde::Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(format!("Store serialization error: {}", e)))
}

fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> AppResult<T> {
    serde_json::from_str(json)
        .map_err(|e| AppError::Internal(format!("Store deserialization error: {}", e)))
}

#[derive(Clone)]
pub struct RedisUserStore {
    conn: ConnectionManager,
    replace_script: Script,
    release_script: Script,
}

impl RedisUserStore {
    /// Connects to Redis; the connection manager reconnects on failure
    pub async fn connect(client: Client) -> AppResult<Self> {
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            replace_script: Script::new(REPLACE_IF_VERSION),
            release_script: Script::new(RELEASE_CLAIM),
        })
    }

    async fn claim(&self, hash_key: &str, uid: &str, value: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let field = value.to_lowercase();

        let _: bool = conn.hset_nx(hash_key, &field, uid).await?;
        let owner: Option<String> = conn.hget(hash_key, &field).await?;

        Ok(owner.as_deref() == Some(uid))
    }

    async fn release(&self, hash_key: &str, uid: &str, value: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: i64 = self
            .release_script
            .key(hash_key)
            .arg(value.to_lowercase())
            .arg(uid)
            .invoke_async(&mut conn)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserStore for RedisUserStore {
    async fn interactions(&self, uid: &str) -> AppResult<Option<UserInteractionRecord>> {
        let mut conn = self.conn.clone();

        let updated: Option<String> = conn.get(interactions_updated_key(uid)).await?;
        let movie_ids: HashSet<MovieId> = conn.smembers(interactions_key(uid)).await?;

        let last_updated = match updated {
            Some(ts) => DateTime::parse_from_rfc3339(&ts)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| AppError::Internal(format!("Invalid interaction timestamp: {}", e)))?,
            // Ids without a marker can only come from a concurrent first write
            None if !movie_ids.is_empty() => Utc::now(),
            None => return Ok(None),
        };

        Ok(Some(UserInteractionRecord {
            movie_ids,
            last_updated,
        }))
    }

    async fn record_interaction(
        &self,
        uid: &str,
        movie_id: MovieId,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut conn = self.conn.clone();

        let added: i64 = conn.sadd(interactions_key(uid), movie_id).await?;
        let updated_key = interactions_updated_key(uid);
        if added > 0 {
            let _: () = conn.set(&updated_key, at.to_rfc3339()).await?;
        } else {
            let _: bool = conn.set_nx(&updated_key, at.to_rfc3339()).await?;
        }

        Ok(added > 0)
    }

    async fn ensure_interaction_record(&self, uid: &str, at: DateTime<Utc>) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: bool = conn
            .set_nx(interactions_updated_key(uid), at.to_rfc3339())
            .await?;
        Ok(())
    }

    async fn list_entries(&self, uid: &str) -> AppResult<Vec<UserListEntry>> {
        let mut conn = self.conn.clone();
        let values: Vec<String> = conn.hvals(list_key(uid)).await?;

        values.iter().map(|json| from_json(json)).collect()
    }

    async fn list_entry(&self, uid: &str, movie_id: MovieId) -> AppResult<Option<UserListEntry>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(list_key(uid), movie_id).await?;

        value.as_deref().map(from_json).transpose()
    }

    async fn insert_list_entry(&self, uid: &str, entry: &UserListEntry) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let inserted: bool = conn
            .hset_nx(list_key(uid), entry.movie_id, to_json(entry)?)
            .await?;
        Ok(inserted)
    }

    async fn replace_list_entry(
        &self,
        uid: &str,
        entry: &UserListEntry,
        expected_version: u64,
    ) -> AppResult<ConditionalWrite> {
        let mut conn = self.conn.clone();
        let outcome: i64 = self
            .replace_script
            .key(list_key(uid))
            .arg(entry.movie_id)
            .arg(expected_version)
            .arg(to_json(entry)?)
            .invoke_async(&mut conn)
            .await?;

        Ok(match outcome {
            1 => ConditionalWrite::Applied,
            0 => ConditionalWrite::VersionMismatch,
            _ => ConditionalWrite::Missing,
        })
    }

    async fn remove_list_entry(&self, uid: &str, movie_id: MovieId) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.hdel(list_key(uid), movie_id).await?;
        Ok(removed > 0)
    }

    async fn profile(&self, uid: &str) -> AppResult<Option<UserProfile>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(profile_key(uid)).await?;

        value.as_deref().map(from_json).transpose()
    }

    async fn save_profile(&self, profile: &UserProfile) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(profile_key(&profile.uid), to_json(profile)?).await?;
        Ok(())
    }

    async fn claim_username(&self, uid: &str, username: &str) -> AppResult<bool> {
        self.claim(USERNAMES_KEY, uid, username).await
    }

    async fn release_username(&self, uid: &str, username: &str) -> AppResult<()> {
        self.release(USERNAMES_KEY, uid, username).await
    }

    async fn claim_email(&self, uid: &str, email: &str) -> AppResult<bool> {
        self.claim(EMAILS_KEY, uid, email).await
    }

    async fn release_email(&self, uid: &str, email: &str) -> AppResult<()> {
        self.release(EMAILS_KEY, uid, email).await
    }

    async fn preferences(&self, uid: &str) -> AppResult<Option<UserPreferences>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(preferences_key(uid)).await?;

        value.as_deref().map(from_json).transpose()
    }

    async fn save_preferences(&self, uid: &str, preferences: &UserPreferences) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(preferences_key(uid), to_json(preferences)?).await?;
        Ok(())
    }

    async fn next_user_id(&self) -> AppResult<u64> {
        let mut conn = self.conn.clone();
        let id: u64 = conn.incr(USER_COUNTER_KEY, 1u64).await?;
        Ok(id)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_redis_client;
    use uuid::Uuid;

    async fn test_store() -> RedisUserStore {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let client = create_redis_client(&redis_url).unwrap();
        RedisUserStore::connect(client).await.unwrap()
    }

    fn entry(movie_id: MovieId, version: u64) -> UserListEntry {
        UserListEntry {
            movie_id,
            movie: None,
            rating: None,
            added_at: Utc::now(),
            version,
        }
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(interactions_key("abc"), "interactions:abc");
        assert_eq!(interactions_updated_key("abc"), "interactions:abc:updated");
        assert_eq!(list_key("abc"), "mylist:abc");
        assert_eq!(profile_key("abc"), "profile:abc");
        assert_eq!(preferences_key("abc"), "preferences:abc");
    }

    #[tokio::test]
    #[ignore = "requires a running Redis instance"]
    async fn test_record_interaction_idempotent() {
        let store = test_store().await;
        let uid = Uuid::new_v4().to_string();

        assert!(store.interactions(&uid).await.unwrap().is_none());
        assert!(store.record_interaction(&uid, 42, Utc::now()).await.unwrap());
        assert!(!store.record_interaction(&uid, 42, Utc::now()).await.unwrap());

        let record = store.interactions(&uid).await.unwrap().unwrap();
        assert_eq!(record.len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis instance"]
    async fn test_empty_record_exists_after_ensure() {
        let store = test_store().await;
        let uid = Uuid::new_v4().to_string();

        store.ensure_interaction_record(&uid, Utc::now()).await.unwrap();
        let record = store.interactions(&uid).await.unwrap().unwrap();
        assert!(record.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis instance"]
    async fn test_replace_list_entry_compare_and_set() {
        let store = test_store().await;
        let uid = Uuid::new_v4().to_string();

        assert!(store.insert_list_entry(&uid, &entry(7, 0)).await.unwrap());
        assert!(!store.insert_list_entry(&uid, &entry(7, 0)).await.unwrap());

        assert_eq!(
            store.replace_list_entry(&uid, &entry(7, 1), 0).await.unwrap(),
            ConditionalWrite::Applied
        );
        assert_eq!(
            store.replace_list_entry(&uid, &entry(7, 2), 0).await.unwrap(),
            ConditionalWrite::VersionMismatch
        );
        assert_eq!(
            store.replace_list_entry(&uid, &entry(8, 1), 0).await.unwrap(),
            ConditionalWrite::Missing
        );

        assert_eq!(store.list_entry(&uid, 7).await.unwrap().unwrap().version, 1);
        assert!(store.remove_list_entry(&uid, 7).await.unwrap());
        assert!(store.list_entries(&uid).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis instance"]
    async fn test_username_claims() {
        let store = test_store().await;
        let name = format!("user-{}", Uuid::new_v4());

        assert!(store.claim_username("a", &name).await.unwrap());
        assert!(!store.claim_username("b", &name.to_uppercase()).await.unwrap());
        store.release_username("a", &name).await.unwrap();
        assert!(store.claim_username("b", &name).await.unwrap());
        store.release_username("b", &name).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running Redis instance"]
    async fn test_email_claim_release() {
        let store = test_store().await;
        let email = format!("{}@example.com", Uuid::new_v4());

        assert!(store.claim_email("a", &email).await.unwrap());
        store.release_email("b", &email).await.unwrap();
        assert!(!store.claim_email("b", &email).await.unwrap());
        store.release_email("a", &email).await.unwrap();
        assert!(store.claim_email("b", &email).await.unwrap());
    }
}
