use serde::Deserialize;
use std::time::Duration;

/// Which document store backs per-user data
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Memory,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL (document store and metadata cache)
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Document store backend
    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackend,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL prepended to poster/backdrop paths
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Remote ML recommendation endpoint. The remote path is skipped when unset.
    #[serde(default)]
    pub ml_api_url: Option<String>,

    /// Deadline applied to every outbound HTTP call
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Interaction count at which the remote ML path is attempted
    #[serde(default = "default_remote_threshold")]
    pub remote_threshold: usize,

    /// Number of results requested from the remote ML endpoint
    #[serde(default = "default_remote_top_k")]
    pub remote_top_k: usize,

    /// Maximum size of a content-based recommendation result
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Maximum number of seed movies used for content-based expansion
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::Redis
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_remote_threshold() -> usize {
    20
}

fn default_remote_top_k() -> usize {
    10
}

fn default_recommendation_limit() -> usize {
    10
}

fn default_seed_count() -> usize {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
