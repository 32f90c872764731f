use chrono::Utc;

use crate::{
    db::UserStore,
    error::AppResult,
    models::{MovieId, UserInteractionRecord},
};

/// Records that `uid` viewed `movie_id`
///
/// Idempotent: a repeated view leaves the record unchanged. Returns true if the
/// movie was new to the record.
pub async fn track_view(store: &dyn UserStore, uid: &str, movie_id: MovieId) -> AppResult<bool> {
    let added = store.record_interaction(uid, movie_id, Utc::now()).await?;
    if added {
        tracing::debug!(uid = %uid, movie_id, "Recorded new interaction");
    }
    Ok(added)
}

pub async fn interactions(store: &dyn UserStore, uid: &str) -> AppResult<Option<UserInteractionRecord>> {
    store.interactions(uid).await
}

/// Whether the user has interacted with at least one movie
pub async fn has_interactions(store: &dyn UserStore, uid: &str) -> AppResult<bool> {
    Ok(store
        .interactions(uid)
        .await?
        .is_some_and(|record| !record.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryUserStore;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_track_view_is_idempotent() {
        let store = MemoryUserStore::new();

        assert!(assert_ok!(track_view(&store, "u1", 603).await));
        let first = store.interactions("u1").await.unwrap().unwrap();

        assert!(!assert_ok!(track_view(&store, "u1", 603).await));
        let second = store.interactions("u1").await.unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn test_track_view_creates_record() {
        let store = MemoryUserStore::new();
        assert!(store.interactions("u1").await.unwrap().is_none());

        track_view(&store, "u1", 1).await.unwrap();
        track_view(&store, "u1", 2).await.unwrap();

        let record = store.interactions("u1").await.unwrap().unwrap();
        assert_eq!(record.movie_ids, [1, 2].into_iter().collect());
    }

    #[tokio::test]
    async fn test_has_interactions() {
        let store = MemoryUserStore::new();
        assert!(!has_interactions(&store, "u1").await.unwrap());

        store.ensure_interaction_record("u1", Utc::now()).await.unwrap();
        assert!(!has_interactions(&store, "u1").await.unwrap());

        track_view(&store, "u1", 42).await.unwrap();
        assert!(has_interactions(&store, "u1").await.unwrap());
    }
}
