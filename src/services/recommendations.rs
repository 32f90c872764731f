use std::sync::Arc;

use crate::{
    db::UserStore,
    error::AppResult,
    models::MovieSummary,
    services::{content_based::ContentRecommender, remote::RemoteRecommender},
};

/// Chooses between the remote model and content-based expansion
///
/// Users with at least `remote_threshold` interactions go to the remote model
/// when one is configured. An empty remote answer falls through to the
/// content-based path.
pub struct RecommendationsService {
    store: Arc<dyn UserStore>,
    remote: Option<RemoteRecommender>,
    content: ContentRecommender,
    remote_threshold: usize,
}

impl RecommendationsService {
    pub fn new(
        store: Arc<dyn UserStore>,
        remote: Option<RemoteRecommender>,
        content: ContentRecommender,
        remote_threshold: usize,
    ) -> Self {
        Self {
            store,
            remote,
            content,
            remote_threshold,
        }
    }

    /// Personalized recommendations for `uid`; never fails, errors yield an empty list
    pub async fn personalized(&self, uid: &str) -> Vec<MovieSummary> {
        match self.try_personalized(uid).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::error!(uid = %uid, error = %e, "Recommendation pipeline failed");
                Vec::new()
            }
        }
    }

    async fn try_personalized(&self, uid: &str) -> AppResult<Vec<MovieSummary>> {
        let Some(record) = self.store.interactions(uid).await? else {
            tracing::info!(uid = %uid, "No interaction record");
            return Ok(Vec::new());
        };

        let count = record.len();

        if count >= self.remote_threshold {
            if let Some(remote) = &self.remote {
                let movies = remote.recommend(uid, &record.movie_ids).await;
                if !movies.is_empty() {
                    tracing::info!(uid = %uid, count, returned = movies.len(), "Serving remote recommendations");
                    return Ok(movies);
                }
                tracing::debug!(uid = %uid, "Remote model returned nothing, using content-based");
            }
        }

        self.content.recommend(uid, &record.movie_ids).await
    }
}
