//! Client for the remote ML recommendation endpoint.
//!
//! The endpoint is a plain HTTP GET taking the platform's numeric `user_id`
//! and `top_k`, answering `{"recommendations": [{"movie_id", "score"}, ...]}`
//! ranked by score.

use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{debug, error};

use crate::{
    error::{AppError, AppResult},
    models::{ScoredMovie, ScoredMoviesResponse},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationModel: Send + Sync {
    /// Top `top_k` scored movies for a platform user id, best first
    async fn top_k(&self, user_id: u64, top_k: usize) -> AppResult<Vec<ScoredMovie>>;
}

#[derive(Clone)]
pub struct HttpRecommendationModel {
    http_client: HttpClient,
    endpoint: String,
}

impl HttpRecommendationModel {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl RecommendationModel for HttpRecommendationModel {
    async fn top_k(&self, user_id: u64, top_k: usize) -> AppResult<Vec<ScoredMovie>> {
        debug!(user_id, top_k, endpoint = %self.endpoint, "Requesting model recommendations");

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("user_id", user_id.to_string()), ("top_k", top_k.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(user_id, status = %status, body = %body, "Recommendation model request failed");
            return Err(AppError::ExternalApi(format!(
                "Recommendation model returned status {}: {}",
                status, body
            )));
        }

        let mut recommendations = response.json::<ScoredMoviesResponse>().await?.recommendations;
        recommendations.truncate(top_k);

        debug!(user_id, returned = recommendations.len(), "Model recommendations received");

        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_top_k_sends_user_id_and_parses_scores() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recommend"))
            .and(query_param("user_id", "42"))
            .and(query_param("top_k", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "recommendations": [
                    {"movie_id": 603, "score": 0.97},
                    {"movie_id": 27205, "score": 0.91}
                ]
            })))
            .mount(&server)
            .await;

        let model = HttpRecommendationModel::new(
            format!("{}/recommend", server.uri()),
            Duration::from_secs(2),
        )
        .unwrap();
        let scored = model.top_k(42, 10).await.unwrap();

        assert_eq!(
            scored,
            vec![
                ScoredMovie { movie_id: 603, score: 0.97 },
                ScoredMovie { movie_id: 27205, score: 0.91 },
            ]
        );
    }

    #[tokio::test]
    async fn test_top_k_truncates_oversized_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recommend"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "recommendations": [
                    {"movie_id": 1, "score": 0.9},
                    {"movie_id": 2, "score": 0.8},
                    {"movie_id": 3, "score": 0.7}
                ]
            })))
            .mount(&server)
            .await;

        let model = HttpRecommendationModel::new(
            format!("{}/recommend", server.uri()),
            Duration::from_secs(2),
        )
        .unwrap();

        assert_eq!(model.top_k(1, 2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_top_k_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model offline"))
            .mount(&server)
            .await;

        let model = HttpRecommendationModel::new(server.uri(), Duration::from_secs(2)).unwrap();
        let result = model.top_k(1, 10).await;

        assert!(matches!(result, Err(AppError::ExternalApi(msg)) if msg.contains("model offline")));
    }
}
