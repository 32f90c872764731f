use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    db::UserStore,
    error::AppResult,
    models::{MovieDetails, MovieId, MovieSummary, ScoredMovie},
    services::{
        ml_client::RecommendationModel,
        providers::{fetch_details_batch, MetadataProvider},
    },
};

/// Recommendations scored by the remote ML model and enriched with metadata
pub struct RemoteRecommender {
    store: Arc<dyn UserStore>,
    model: Arc<dyn RecommendationModel>,
    metadata: Arc<dyn MetadataProvider>,
    top_k: usize,
}

impl RemoteRecommender {
    pub fn new(
        store: Arc<dyn UserStore>,
        model: Arc<dyn RecommendationModel>,
        metadata: Arc<dyn MetadataProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            store,
            model,
            metadata,
            top_k,
        }
    }

    /// Model recommendations for `uid`, best first
    ///
    /// Empty when the user has no numeric platform id or the model call fails.
    /// Repeated ids and ids in `seen` are dropped before enrichment, as are
    /// items whose detail lookup fails; the rest keep the model's order.
    pub async fn recommend(&self, uid: &str, seen: &HashSet<MovieId>) -> Vec<MovieSummary> {
        match self.try_recommend(uid, seen).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::error!(uid = %uid, error = %e, "Remote recommendation failed");
                Vec::new()
            }
        }
    }

    async fn try_recommend(
        &self,
        uid: &str,
        seen: &HashSet<MovieId>,
    ) -> AppResult<Vec<MovieSummary>> {
        let Some(user_id) = self.store.profile(uid).await?.and_then(|p| p.user_id) else {
            tracing::warn!(uid = %uid, "No numeric user id on profile, skipping remote model");
            return Ok(Vec::new());
        };

        let returned = self.model.top_k(user_id, self.top_k).await?;
        let returned_count = returned.len();

        let scored = unseen_distinct(returned, seen);
        if scored.is_empty() {
            tracing::debug!(uid = %uid, returned = returned_count, "No unseen model recommendations");
            return Ok(Vec::new());
        }

        let movie_ids = scored.iter().map(|s| s.movie_id).collect();
        let details = fetch_details_batch(self.metadata.clone(), movie_ids).await;

        let movies = enrich(scored, details);

        tracing::info!(
            uid = %uid,
            user_id,
            returned = movies.len(),
            "Remote recommendations enriched"
        );

        Ok(movies)
    }
}

/// Keeps the first occurrence of each id and drops ids the user has seen
fn unseen_distinct(scored: Vec<ScoredMovie>, seen: &HashSet<MovieId>) -> Vec<ScoredMovie> {
    let mut kept = HashSet::with_capacity(scored.len());
    scored
        .into_iter()
        .filter(|s| !seen.contains(&s.movie_id) && kept.insert(s.movie_id))
        .collect()
}

/// Pairs each scored movie with its lookup result, keeping the model's order
fn enrich(
    scored: Vec<ScoredMovie>,
    details: Vec<Option<MovieDetails>>,
) -> Vec<MovieSummary> {
    scored
        .into_iter()
        .zip(details)
        .filter_map(|(scored, details)| {
            details.map(|d| MovieSummary {
                recommendation_score: Some(scored.score),
                ..d.summary
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryUserStore;
    use crate::error::AppError;
    use crate::models::UserProfile;
    use crate::services::ml_client::MockRecommendationModel;
    use crate::services::providers::MockMetadataProvider;
    use crate::test_support::details;
    use chrono::Utc;

    async fn store_with_profile(user_id: Option<u64>) -> Arc<MemoryUserStore> {
        let store = Arc::new(MemoryUserStore::new());
        store
            .save_profile(&UserProfile {
                uid: "u1".to_string(),
                user_id,
                username: "moviebuff".to_string(),
                email: "buff@example.com".to_string(),
                display_name: None,
                photo_url: None,
                providers: vec![],
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        store
    }

    fn metadata_failing_on(failing: u64) -> MockMetadataProvider {
        let mut metadata = MockMetadataProvider::new();
        metadata.expect_name().return_const("mock");
        metadata.expect_movie_details().returning(move |id| {
            if id == failing {
                Err(AppError::ExternalApi("lookup failed".to_string()))
            } else {
                Ok(details(id))
            }
        });
        metadata
    }

    #[tokio::test]
    async fn test_missing_numeric_id_returns_empty_without_model_call() {
        let store = store_with_profile(None).await;
        let mut model = MockRecommendationModel::new();
        model.expect_top_k().never();

        let recommender = RemoteRecommender::new(
            store,
            Arc::new(model),
            Arc::new(MockMetadataProvider::new()),
            10,
        );

        assert!(recommender.recommend("u1", &HashSet::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_profile_returns_empty() {
        let mut model = MockRecommendationModel::new();
        model.expect_top_k().never();

        let recommender = RemoteRecommender::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(model),
            Arc::new(MockMetadataProvider::new()),
            10,
        );

        assert!(recommender.recommend("nobody", &HashSet::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookup_dropped_and_order_kept() {
        let store = store_with_profile(Some(42)).await;
        let mut model = MockRecommendationModel::new();
        model
            .expect_top_k()
            .withf(|user_id, top_k| *user_id == 42 && *top_k == 10)
            .returning(|_, _| {
                Ok(vec![
                    ScoredMovie { movie_id: 30, score: 0.9 },
                    ScoredMovie { movie_id: 10, score: 0.8 },
                    ScoredMovie { movie_id: 20, score: 0.7 },
                ])
            });

        let recommender =
            RemoteRecommender::new(store, Arc::new(model), Arc::new(metadata_failing_on(10)), 10);

        let movies = recommender.recommend("u1", &HashSet::new()).await;
        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();

        assert_eq!(ids, vec![30, 20]);
        assert_eq!(movies[0].recommendation_score, Some(0.9));
        assert_eq!(movies[1].recommendation_score, Some(0.7));
    }

    #[tokio::test]
    async fn test_repeated_and_seen_ids_dropped() {
        let store = store_with_profile(Some(42)).await;
        let mut model = MockRecommendationModel::new();
        model.expect_top_k().returning(|_, _| {
            Ok(vec![
                ScoredMovie { movie_id: 30, score: 0.9 },
                ScoredMovie { movie_id: 10, score: 0.8 },
                ScoredMovie { movie_id: 10, score: 0.6 },
                ScoredMovie { movie_id: 20, score: 0.5 },
            ])
        });
        let mut metadata = MockMetadataProvider::new();
        metadata.expect_name().return_const("mock");
        metadata
            .expect_movie_details()
            .withf(|id| *id != 30)
            .times(2)
            .returning(|id| Ok(details(id)));

        let recommender = RemoteRecommender::new(store, Arc::new(model), Arc::new(metadata), 10);
        let seen: HashSet<MovieId> = [30].into_iter().collect();

        let movies = recommender.recommend("u1", &seen).await;
        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();

        assert_eq!(ids, vec![10, 20]);
        assert_eq!(movies[0].recommendation_score, Some(0.8));
    }

    #[tokio::test]
    async fn test_only_seen_ids_returns_empty() {
        let store = store_with_profile(Some(42)).await;
        let mut model = MockRecommendationModel::new();
        model
            .expect_top_k()
            .returning(|_, _| Ok(vec![ScoredMovie { movie_id: 30, score: 0.9 }]));
        let mut metadata = MockMetadataProvider::new();
        metadata.expect_movie_details().never();

        let recommender = RemoteRecommender::new(store, Arc::new(model), Arc::new(metadata), 10);
        let seen: HashSet<MovieId> = [30].into_iter().collect();

        assert!(recommender.recommend("u1", &seen).await.is_empty());
    }

    #[tokio::test]
    async fn test_model_error_returns_empty() {
        let store = store_with_profile(Some(42)).await;
        let mut model = MockRecommendationModel::new();
        model
            .expect_top_k()
            .returning(|_, _| Err(AppError::ExternalApi("down".to_string())));

        let recommender = RemoteRecommender::new(
            store,
            Arc::new(model),
            Arc::new(MockMetadataProvider::new()),
            10,
        );

        assert!(recommender.recommend("u1", &HashSet::new()).await.is_empty());
    }
}
