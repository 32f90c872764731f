use std::sync::Arc;

use crate::{
    config::Config,
    db::UserStore,
    services::{
        ContentRecommender, MetadataProvider, RecommendationModel, RecommendationsService,
        RemoteRecommender,
    },
};

/// Tunables of the recommendation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationSettings {
    pub remote_threshold: usize,
    pub remote_top_k: usize,
    pub recommendation_limit: usize,
    pub seed_count: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            remote_threshold: 20,
            remote_top_k: 10,
            recommendation_limit: 10,
            seed_count: 5,
        }
    }
}

impl From<&Config> for RecommendationSettings {
    fn from(config: &Config) -> Self {
        Self {
            remote_threshold: config.remote_threshold,
            remote_top_k: config.remote_top_k,
            recommendation_limit: config.recommendation_limit,
            seed_count: config.seed_count,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub recommendations: Arc<RecommendationsService>,
}

impl AppState {
    /// Wires the recommendation pipeline; without a model only the content-based path runs
    pub fn new(
        store: Arc<dyn UserStore>,
        metadata: Arc<dyn MetadataProvider>,
        model: Option<Arc<dyn RecommendationModel>>,
        settings: RecommendationSettings,
    ) -> Self {
        let remote = model.map(|model| {
            RemoteRecommender::new(store.clone(), model, metadata.clone(), settings.remote_top_k)
        });
        let content = ContentRecommender::new(
            store.clone(),
            metadata.clone(),
            settings.seed_count,
            settings.recommendation_limit,
        );
        let recommendations = Arc::new(RecommendationsService::new(
            store.clone(),
            remote,
            content,
            settings.remote_threshold,
        ));

        Self {
            store,
            metadata,
            recommendations,
        }
    }
}
