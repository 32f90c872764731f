pub mod content_based;
pub mod interactions;
pub mod ml_client;
pub mod my_list;
pub mod preferences;
pub mod profiles;
pub mod providers;
pub mod recommendations;
pub mod remote;

pub use content_based::ContentRecommender;
pub use ml_client::{HttpRecommendationModel, RecommendationModel};
pub use providers::{tmdb::TmdbProvider, MetadataProvider};
pub use recommendations::RecommendationsService;
pub use remote::RemoteRecommender;
