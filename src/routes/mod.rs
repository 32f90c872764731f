use axum::{
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};

pub mod interactions;
pub mod list;
pub mod movies;
pub mod people;
pub mod preferences;
pub mod profile;
pub mod recommendations;
pub mod state;

pub use state::{AppState, RecommendationSettings};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Browse and search
        .route("/movies/trending", get(movies::trending))
        .route("/movies/top-rated", get(movies::top_rated))
        .route("/movies/now-playing", get(movies::now_playing))
        .route("/movies/search", get(movies::search))
        .route("/movies/genre/:genre_id", get(movies::by_genre))
        .route("/movies/country/:code", get(movies::by_country))
        .route("/movies/people", get(movies::by_people))
        .route("/movies/:id", get(movies::details))
        .route("/movies/:id/similar", get(movies::similar))
        .route("/movies/:id/videos", get(movies::videos))
        .route("/movies/:id/reviews", get(movies::reviews))
        .route("/movies/:id/keywords", get(movies::keywords))
        .route("/people/search", get(people::search))
        .route("/people/:id", get(people::details))
        .route("/people/:id/movie-credits", get(people::movie_credits))
        // Signed-in user
        .route("/me/views", post(interactions::track_view))
        .route("/me/interactions", get(interactions::summary))
        .route("/me/interactions/exists", get(interactions::has_interactions))
        .route("/me/list", get(list::list).post(list::add))
        .route("/me/list/:movie_id", patch(list::update).delete(list::remove))
        .route("/me/recommendations", get(recommendations::personalized))
        .route("/me/preferences", get(preferences::get).post(preferences::save))
        .route(
            "/me/profile",
            get(profile::get).post(profile::register).patch(profile::update),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
